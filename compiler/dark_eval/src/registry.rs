//! Function records and the registry that resolves names to them.
//!
//! Built-ins, user functions and package functions share one record shape.
//! Dispatch only cares about [`Function::implementation`] once the name is
//! resolved and the arguments pass their checks.

use std::fmt;
use std::sync::Arc;

use dark_ir::{DType, Expr, FQFnName, PackageFnName, Tlid};
use dark_value::Dval;
use futures_util::future::BoxFuture;
use rustc_hash::FxHashMap;

use crate::ExecutionState;

/// Native implementation of a built-in.
///
/// Receives a clone of the calling state so it can call back into the
/// interpreter (to apply a lambda, say).
pub type BuiltinFn = Arc<
    dyn std::ops::Fn(ExecutionState, Vec<Dval>) -> BoxFuture<'static, Result<Dval, BuiltinError>>
        + Send
        + Sync,
>;

/// Failure of a built-in. Dispatch turns these into `Error` values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuiltinError {
    /// Arguments passed the type check but not the built-in's own match.
    #[error("wrong argument types")]
    WrongArgs,
    #[error("{0}")]
    Runtime(String),
    /// A fake value produced inside the built-in, returned as-is.
    #[error("fake value")]
    FakeValue(Dval),
}

impl BuiltinError {
    pub fn runtime(msg: impl Into<String>) -> Self {
        BuiltinError::Runtime(msg.into())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub typ: DType,
    pub description: String,
}

impl Param {
    pub fn new(name: &str, typ: DType, description: &str) -> Self {
        Param {
            name: name.to_string(),
            typ,
            description: description.to_string(),
        }
    }
}

/// What preview may do with a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Previewable {
    /// No side effects. Safe to run at any time.
    Pure,
    /// Has side effects that are harmless to repeat, like reading the clock.
    ImpurePreviewable,
    /// Never run during preview; only recorded results are shown.
    Impure,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Deprecation {
    NotDeprecated,
    ReplacedBy(FQFnName),
    DeprecatedBecause(String),
}

#[derive(Clone)]
pub enum FnImpl {
    Builtin(BuiltinFn),
    UserFunction(Tlid, Arc<Expr>),
    PackageFunction(Tlid, Arc<Expr>),
}

impl fmt::Debug for FnImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FnImpl::Builtin(_) => f.write_str("Builtin(<native>)"),
            FnImpl::UserFunction(tlid, _) => write!(f, "UserFunction({tlid:?})"),
            FnImpl::PackageFunction(tlid, _) => write!(f, "PackageFunction({tlid:?})"),
        }
    }
}

/// A callable function, whatever its origin.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: FQFnName,
    pub parameters: Vec<Param>,
    pub return_type: DType,
    pub description: String,
    pub previewable: Previewable,
    pub deprecated: Deprecation,
    pub implementation: FnImpl,
}

impl Function {
    /// A pure, non-deprecated built-in.
    pub fn builtin(
        name: FQFnName,
        parameters: Vec<Param>,
        return_type: DType,
        description: &str,
        implementation: BuiltinFn,
    ) -> Self {
        Function {
            name,
            parameters,
            return_type,
            description: description.to_string(),
            previewable: Previewable::Pure,
            deprecated: Deprecation::NotDeprecated,
            implementation: FnImpl::Builtin(implementation),
        }
    }

    #[must_use]
    pub fn with_previewable(mut self, previewable: Previewable) -> Self {
        self.previewable = previewable;
        self
    }

    #[must_use]
    pub fn with_deprecation(mut self, deprecated: Deprecation) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn param_types(&self) -> impl Iterator<Item = (&str, &DType)> {
        self.parameters.iter().map(|p| (p.name.as_str(), &p.typ))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.implementation, FnImpl::Builtin(_))
    }
}

/// A function written by the program's author.
#[derive(Clone, Debug)]
pub struct UserFn {
    pub tlid: Tlid,
    pub name: String,
    pub parameters: Vec<Param>,
    pub return_type: DType,
    pub description: String,
    pub body: Arc<Expr>,
}

impl From<UserFn> for Function {
    fn from(f: UserFn) -> Self {
        Function {
            name: FQFnName::user(&f.name),
            parameters: f.parameters,
            return_type: f.return_type,
            description: f.description,
            previewable: Previewable::Impure,
            deprecated: Deprecation::NotDeprecated,
            implementation: FnImpl::UserFunction(f.tlid, f.body),
        }
    }
}

/// A function from a published package.
#[derive(Clone, Debug)]
pub struct PackageFn {
    pub tlid: Tlid,
    pub name: PackageFnName,
    pub parameters: Vec<Param>,
    pub return_type: DType,
    pub description: String,
    pub deprecated: bool,
    pub body: Arc<Expr>,
}

impl From<PackageFn> for Function {
    fn from(f: PackageFn) -> Self {
        let deprecated = if f.deprecated {
            Deprecation::DeprecatedBecause("deprecated by its package".to_string())
        } else {
            Deprecation::NotDeprecated
        };
        Function {
            name: FQFnName::Package(f.name),
            parameters: f.parameters,
            return_type: f.return_type,
            description: f.description,
            previewable: Previewable::Impure,
            deprecated,
            implementation: FnImpl::PackageFunction(f.tlid, f.body),
        }
    }
}

/// Every function a program can call, by fully-qualified name.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    fns: FxHashMap<FQFnName, Arc<Function>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard library.
    pub fn with_stdlib() -> Self {
        let mut registry = Self::new();
        registry.extend(crate::stdlib::contents());
        registry
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn add(&mut self, function: impl Into<Function>) {
        let function = function.into();
        self.fns.insert(function.name.clone(), Arc::new(function));
    }

    pub fn extend(&mut self, functions: impl IntoIterator<Item = Function>) {
        for function in functions {
            self.add(function);
        }
    }

    pub fn resolve(&self, name: &FQFnName) -> Option<Arc<Function>> {
        let function = self.fns.get(name)?;
        match &function.deprecated {
            Deprecation::NotDeprecated => {}
            Deprecation::ReplacedBy(replacement) => {
                tracing::debug!(function = %name, %replacement, "calling deprecated function");
            }
            Deprecation::DeprecatedBecause(reason) => {
                tracing::debug!(function = %name, %reason, "calling deprecated function");
            }
        }
        Some(Arc::clone(function))
    }

    pub fn len(&self) -> usize {
        self.fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }
}
