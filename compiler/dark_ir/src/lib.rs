//! Dark IR - expression trees and naming for the Dark runtime.
//!
//! This crate provides the data the interpreter walks over. It has no
//! evaluation logic of its own:
//! - `Id` / `Tlid`: node ids and toplevel ids, used for tracing and highlighting
//! - `Expr` / `Pattern`: the expression tree, one variant per node kind
//! - `FQFnName`: fully-qualified function descriptors (stdlib, user, package)
//! - `DType`: declared types for parameters, return values and record columns
//!
//! Expressions are produced by an external parser or editor. With the `serde`
//! feature enabled, every type here can be loaded from JSON.

mod dtype;
mod expr;
mod fn_name;
mod id;

#[cfg(feature = "serde")]
mod serde_bigint;

pub use dtype::{DType, RecordField, UserType, UserTypeName};
pub use expr::{Expr, IsInPipe, Pattern, SendToRail};
pub use fn_name::{FQFnName, FnNameParseError, PackageFnName, StdlibFnName};
pub use id::{Id, Tlid};
