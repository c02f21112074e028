//! Dark values - the `Dval` runtime value model.
//!
//! Every expression in the interpreter evaluates to a `Dval`. Values are
//! immutable; containers share their payloads through [`Heap`] so cloning a
//! value is cheap.

mod dval;
mod error;
mod heap;
mod password;

pub use dval::{DHttpResponse, Dval, DvalMap, DvalSource, FnValImpl, LambdaImpl, Symtable};
pub use error::ValueError;
pub use heap::Heap;
pub use password::Password;

// Re-exported so downstream crates name one integer type.
pub use num_bigint::BigInt;
