//! Execution configuration and the state threaded through evaluation.

use std::sync::Arc;

use dark_ir::{Id, Tlid};
use dark_typecheck::UserTypes;
use dark_value::DvalSource;

use crate::diagnostics::{CallFrame, CallStack};
use crate::eval_mode::RealOrPreview;
use crate::registry::FunctionRegistry;
use crate::trace::{NoopTraceStore, TraceStore};

/// Per-run settings chosen by the embedder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionConfig {
    pub real_or_preview: RealOrPreview,
    /// Version of the argument hash used to key recorded results.
    pub hash_version: u32,
    /// Toplevel whose code is being evaluated.
    pub tlid: Tlid,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            real_or_preview: RealOrPreview::Real,
            hash_version: dark_repr::CURRENT_HASH_VERSION,
            tlid: Tlid::default(),
        }
    }
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preview(mut self) -> Self {
        self.real_or_preview = RealOrPreview::Preview;
        self
    }

    #[must_use]
    pub fn with_hash_version(mut self, version: u32) -> Self {
        self.hash_version = version;
        self
    }

    #[must_use]
    pub fn with_tlid(mut self, tlid: Tlid) -> Self {
        self.tlid = tlid;
        self
    }
}

/// Everything evaluation needs besides the symtable.
///
/// Cheap to clone: shared parts sit behind `Arc`s, and the call stack is
/// cloned per child call.
#[derive(Clone)]
pub struct ExecutionState {
    config: ExecutionConfig,
    libraries: Arc<FunctionRegistry>,
    user_types: Arc<UserTypes>,
    tracing: Arc<dyn TraceStore>,
    call_stack: CallStack,
    on_execution_path: bool,
}

impl ExecutionState {
    pub fn new(libraries: Arc<FunctionRegistry>, config: ExecutionConfig) -> Self {
        ExecutionState {
            config,
            libraries,
            user_types: Arc::default(),
            tracing: Arc::new(NoopTraceStore),
            call_stack: CallStack::new(),
            on_execution_path: true,
        }
    }

    #[must_use]
    pub fn with_tracing(mut self, tracing: Arc<dyn TraceStore>) -> Self {
        self.tracing = tracing;
        self
    }

    #[must_use]
    pub fn with_user_types(mut self, user_types: UserTypes) -> Self {
        self.user_types = Arc::new(user_types);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> RealOrPreview {
        self.config.real_or_preview
    }

    #[inline]
    pub fn is_preview(&self) -> bool {
        self.config.real_or_preview.is_preview()
    }

    /// `false` while previewing code that was not actually taken.
    #[inline]
    pub fn on_execution_path(&self) -> bool {
        self.on_execution_path
    }

    pub fn libraries(&self) -> &FunctionRegistry {
        &self.libraries
    }

    pub fn user_types(&self) -> &UserTypes {
        &self.user_types
    }

    pub fn tracing(&self) -> &dyn TraceStore {
        &*self.tracing
    }

    pub(crate) fn tracing_arc(&self) -> Arc<dyn TraceStore> {
        Arc::clone(&self.tracing)
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Source location of node `id` in the current toplevel.
    #[inline]
    pub fn source(&self, id: Id) -> DvalSource {
        DvalSource::Node(self.config.tlid, id)
    }

    /// State for speculatively evaluating code that was not taken.
    ///
    /// Effects are suppressed as in any preview, and traces are marked as
    /// not executed.
    #[must_use]
    pub(crate) fn for_preview(&self) -> Self {
        let mut state = self.clone();
        state.config.real_or_preview = RealOrPreview::Preview;
        state.on_execution_path = false;
        state
    }

    /// State for the body of a called function.
    #[must_use]
    pub(crate) fn for_call(&self, frame: CallFrame) -> Self {
        let mut state = self.clone();
        state.call_stack = self.call_stack.with(frame);
        state
    }

    #[must_use]
    pub(crate) fn in_toplevel(mut self, tlid: Tlid) -> Self {
        self.config.tlid = tlid;
        self
    }
}

impl std::fmt::Debug for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionState")
            .field("config", &self.config)
            .field("functions", &self.libraries.len())
            .field("call_depth", &self.call_stack.depth())
            .field("on_execution_path", &self.on_execution_path)
            .finish_non_exhaustive()
    }
}
