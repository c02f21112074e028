//! The JSON program format read by `darkc eval`.
//!
//! ```json
//! {
//!   "expr": {"Integer": [1, "5"]},
//!   "functions": [{"tlid": 7, "name": "double", "parameters": [...], ...}],
//!   "inputs": {"request": {"type": "option", "value": 1}}
//! }
//! ```
//!
//! Expressions and types use the serialized forms from `dark_ir`. Input
//! values use the roundtrippable representation.

use std::path::Path;
use std::sync::Arc;

use dark_eval::{FunctionRegistry, PackageFn, Param, UserFn};
use dark_ir::{DType, Expr, PackageFnName, Tlid, UserType};
use dark_typecheck::UserTypes;
use dark_value::Symtable;
use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Deserialize)]
pub struct Program {
    pub expr: Expr,
    /// Toplevel the expression belongs to.
    #[serde(default)]
    pub tlid: Tlid,
    #[serde(default)]
    pub functions: Vec<UserFnDef>,
    #[serde(default)]
    pub packages: Vec<PackageFnDef>,
    #[serde(default)]
    pub types: Vec<UserType>,
    /// Variables in scope, as roundtrippable JSON.
    #[serde(default)]
    pub inputs: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub typ: DType,
    #[serde(default)]
    pub description: String,
}

impl From<ParamDef> for Param {
    fn from(p: ParamDef) -> Self {
        Param::new(&p.name, p.typ, &p.description)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserFnDef {
    pub tlid: Tlid,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParamDef>,
    pub return_type: DType,
    #[serde(default)]
    pub description: String,
    pub body: Expr,
}

#[derive(Debug, Deserialize)]
pub struct PackageFnDef {
    pub tlid: Tlid,
    pub name: PackageFnName,
    #[serde(default)]
    pub parameters: Vec<ParamDef>,
    pub return_type: DType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deprecated: bool,
    pub body: Expr,
}

impl Program {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The standard library plus this program's functions.
    pub fn registry(&mut self) -> FunctionRegistry {
        let mut registry = FunctionRegistry::with_stdlib();
        for f in self.functions.drain(..) {
            registry.add(UserFn {
                tlid: f.tlid,
                name: f.name,
                parameters: f.parameters.into_iter().map(Param::from).collect(),
                return_type: f.return_type,
                description: f.description,
                body: Arc::new(f.body),
            });
        }
        for f in self.packages.drain(..) {
            registry.add(PackageFn {
                tlid: f.tlid,
                name: f.name,
                parameters: f.parameters.into_iter().map(Param::from).collect(),
                return_type: f.return_type,
                description: f.description,
                deprecated: f.deprecated,
                body: Arc::new(f.body),
            });
        }
        registry
    }

    pub fn user_types(&self) -> UserTypes {
        dark_typecheck::user_types(self.types.iter().cloned())
    }

    pub fn symtable(&self) -> Result<Symtable, CliError> {
        self.inputs
            .iter()
            .map(|(name, value)| {
                let dv = dark_repr::roundtrip::of_json(&value.to_string())?;
                Ok::<_, CliError>((name.clone(), dv))
            })
            .collect()
    }
}
