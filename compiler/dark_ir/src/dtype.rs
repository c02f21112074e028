//! Declared types.
//!
//! `DType` is what a function signature, a record column or a user type
//! definition promises. Runtime values are checked against it structurally.

use std::fmt;

/// Name and version of a user-defined record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserTypeName {
    pub name: String,
    pub version: u32,
}

impl UserTypeName {
    pub fn new(name: &str, version: u32) -> Self {
        UserTypeName {
            name: name.to_string(),
            version,
        }
    }
}

/// A declared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    TInt,
    TFloat,
    TBool,
    TNull,
    TStr,
    TChar,
    TList(Box<DType>),
    TDict(Box<DType>),
    TIncomplete,
    TError,
    THttpResponse(Box<DType>),
    TDB(Box<DType>),
    TDate,
    TPassword,
    TUuid,
    TOption(Box<DType>),
    TErrorRail,
    TResult(Box<DType>, Box<DType>),
    TBytes,
    /// A type variable such as `'a`. Unifies with anything.
    TVariable(String),
    TFn(Vec<DType>, Box<DType>),
    TRecord(Vec<RecordField>),
    TUserType(UserTypeName),
}

impl DType {
    /// Shorthand for the unconstrained type variable `'a`.
    pub fn any() -> Self {
        DType::TVariable("a".to_string())
    }

    pub fn list(inner: DType) -> Self {
        DType::TList(Box::new(inner))
    }

    pub fn dict(inner: DType) -> Self {
        DType::TDict(Box::new(inner))
    }

    pub fn option(inner: DType) -> Self {
        DType::TOption(Box::new(inner))
    }

    pub fn result(ok: DType, err: DType) -> Self {
        DType::TResult(Box::new(ok), Box::new(err))
    }

    /// The user-facing name of this type, used in error messages.
    ///
    /// Only the outer constructor is named: `List`, not `List<Int>`.
    pub fn type_name(&self) -> String {
        let name = match self {
            DType::TInt => "Int",
            DType::TFloat => "Float",
            DType::TBool => "Bool",
            DType::TNull => "Null",
            DType::TStr => "Str",
            DType::TChar => "Character",
            DType::TList(_) => "List",
            DType::TDict(_) | DType::TRecord(_) => "Dict",
            DType::TIncomplete => "Incomplete",
            DType::TError => "Error",
            DType::THttpResponse(_) => "Response",
            DType::TDB(_) => "DB",
            DType::TDate => "Date",
            DType::TPassword => "Password",
            DType::TUuid => "UUID",
            DType::TOption(_) => "Option",
            DType::TErrorRail => "ErrorRail",
            DType::TResult(_, _) => "Result",
            DType::TBytes => "Bytes",
            DType::TFn(_, _) => "Block",
            DType::TVariable(name) => return format!("'{name}"),
            DType::TUserType(user) => return user.name.clone(),
        };
        name.to_string()
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// One named, typed field of a record type or a DB schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordField {
    pub name: String,
    pub typ: DType,
}

impl RecordField {
    pub fn new(name: &str, typ: DType) -> Self {
        RecordField {
            name: name.to_string(),
            typ,
        }
    }
}

/// A user-defined record type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserType {
    pub name: UserTypeName,
    pub fields: Vec<RecordField>,
}
