//! Real versus preview execution.
//!
//! Real execution runs a program for its effects. Preview execution is the
//! speculative run an editor performs to show live values: impure functions
//! are not called, recorded results are replayed where available, and
//! missing data degrades to `Incomplete` instead of an error.

/// How the current evaluation treats effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RealOrPreview {
    #[default]
    Real,
    Preview,
}

impl RealOrPreview {
    #[inline]
    pub fn is_preview(self) -> bool {
        matches!(self, Self::Preview)
    }

    /// Whether functions declared `Impure` may run.
    #[inline]
    pub fn allows_impure_calls(self) -> bool {
        matches!(self, Self::Real)
    }

    /// Whether an unbound variable is `Incomplete` rather than an error.
    ///
    /// During preview the trace data a variable would come from may be
    /// missing, and that must not look like a user error.
    #[inline]
    pub fn unbound_variable_is_incomplete(self) -> bool {
        matches!(self, Self::Preview)
    }

    /// Whether recorded function results stand in for missing or
    /// side-effecting functions.
    #[inline]
    pub fn replays_recorded_results(self) -> bool {
        matches!(self, Self::Preview)
    }
}
