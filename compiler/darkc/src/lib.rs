//! Dark CLI library.
//!
//! The binary in `main.rs` is a thin wrapper over this crate:
//! - `commands`: argument parsing and the `eval` / `hash` subcommands
//! - `program`: the JSON program format
//! - `tracing_setup`: subscriber installation

pub mod commands;
mod error;
pub mod program;
pub mod tracing_setup;

pub use error::CliError;
