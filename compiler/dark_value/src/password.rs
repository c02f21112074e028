//! Opaque password bytes.

use std::fmt;

use crate::Heap;

/// Hashed password bytes.
///
/// `Debug` is redacted. The bytes are only reachable through
/// [`Password::expose`], which the roundtrippable codecs use.
#[derive(Clone, PartialEq)]
pub struct Password(Heap<Vec<u8>>);

impl Password {
    pub fn new(bytes: Vec<u8>) -> Self {
        Password(Heap::new(bytes))
    }

    /// The raw bytes. Never use this for display.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<Password>")
    }
}
