//! Shared immutable heap storage for `Dval` payloads.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An `Arc` whose constructor is private to this crate.
///
/// Heap-backed `Dval` variants can only be built through the factory methods
/// on `Dval`, which is where normalization and the error-rail rules live.
#[derive(PartialEq)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: Clone> Heap<T> {
    /// Clone the payload out, reusing the allocation when uniquely owned.
    pub fn into_inner(self) -> T {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> AsRef<T> for Heap<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Display + ?Sized> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
