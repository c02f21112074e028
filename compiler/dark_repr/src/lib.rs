//! Dark representations - every way a `Dval` leaves the interpreter.
//!
//! Each codec has its own contract and compatibility requirements:
//!
//! | Module | Use | Reversible |
//! |---|---|---|
//! | [`roundtrip`] | traces and stored results | yes, for [`roundtrip::is_roundtrippable`] values |
//! | [`queryable`] | indexed storage, records only | yes, for [`queryable::is_queryable`] values |
//! | [`developer`] | error messages, debugging | no |
//! | [`enduser`] | text shown to end users | no |
//! | [`pretty_json`] | structured API responses | no |
//! | [`hashable`] | memoization keys | no |

pub mod developer;
pub mod enduser;
mod error;
mod format;
pub mod hashable;
pub mod pretty_json;
pub mod queryable;
pub mod roundtrip;

pub use developer::to_developer_repr;
pub use enduser::to_enduser_readable_text;
pub use error::ReprError;
pub use hashable::{hash, CURRENT_HASH_VERSION, SUPPORTED_HASH_VERSIONS};
pub use pretty_json::to_pretty_machine_json_v1;
