//! Call stack tracking for function dispatch.
//!
//! The stack is only consulted in preview, to stop speculative evaluation of
//! a function that is already being evaluated. Real execution has no depth
//! limit.

use dark_ir::{FQFnName, Id};
use im::Vector;

/// One in-flight function call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    pub name: FQFnName,
    /// The `Apply` node that made the call.
    pub caller_id: Id,
}

/// In-flight calls, outermost first.
///
/// Frames live in a persistent vector: a child stack shares its parent's
/// frames, so sibling calls never observe each other's frames and pushing
/// does not copy the whole stack.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vector<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this stack with `frame` on top.
    #[must_use]
    pub fn with(&self, frame: CallFrame) -> Self {
        let mut frames = self.frames.clone();
        frames.push_back(frame);
        Self { frames }
    }

    /// The outermost in-flight call to `name`, if any.
    pub fn outer_call(&self, name: &FQFnName) -> Option<&CallFrame> {
        self.frames.iter().find(|frame| &frame.name == name)
    }

    /// The `Apply` node of the innermost call.
    pub fn caller_id(&self) -> Option<Id> {
        self.frames.last().map(|frame| frame.caller_id)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
