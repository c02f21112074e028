//! Live-value tracing and recorded function results.
//!
//! The interpreter reports every evaluated node through a [`TraceStore`].
//! Impure and user function results are persisted through the same store
//! so preview can replay them later without repeating side effects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dark_ir::{FQFnName, Id, Tlid};
use dark_value::Dval;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Identifies one call of one function from one place in a program.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnCallSite {
    /// Toplevel the calling expression belongs to.
    pub tlid: Tlid,
    pub name: FQFnName,
    pub caller_id: Id,
}

/// A traced node value.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveValue {
    pub dval: Dval,
    /// `false` for values produced while previewing a branch not taken.
    pub executed: bool,
}

/// Sink for live values and source of recorded results.
///
/// Loading and storing results may touch external storage and are async.
/// Node tracing happens on every evaluation step and must not block.
#[async_trait::async_trait]
pub trait TraceStore: Send + Sync {
    async fn load_result(&self, site: &FnCallSite, arg_hash: &str) -> Option<(Dval, DateTime<Utc>)>;

    async fn store_result(&self, site: &FnCallSite, arg_hash: &str, args: &[Dval], result: &Dval);

    fn trace_dval(&self, on_execution_path: bool, id: Id, dval: &Dval);

    /// Record that a toplevel's code ran.
    fn trace_tlid(&self, tlid: Tlid);
}

/// Discards everything. Used for real execution when nobody is watching.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTraceStore;

#[async_trait::async_trait]
impl TraceStore for NoopTraceStore {
    async fn load_result(&self, _site: &FnCallSite, _arg_hash: &str) -> Option<(Dval, DateTime<Utc>)> {
        None
    }

    async fn store_result(&self, _site: &FnCallSite, _arg_hash: &str, _args: &[Dval], _result: &Dval) {}

    fn trace_dval(&self, _on_execution_path: bool, _id: Id, _dval: &Dval) {}

    fn trace_tlid(&self, _tlid: Tlid) {}
}

/// Keeps everything in memory. The last write for a key wins.
#[derive(Debug, Default)]
pub struct InMemoryTraceStore {
    results: Mutex<FxHashMap<(FnCallSite, String), (Dval, DateTime<Utc>)>>,
    live_values: Mutex<FxHashMap<Id, LiveValue>>,
    tlids: Mutex<Vec<Tlid>>,
}

impl InMemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a recorded result, as if a previous execution had stored it.
    pub fn record_result(&self, site: FnCallSite, arg_hash: &str, result: Dval) {
        self.results
            .lock()
            .insert((site, arg_hash.to_string()), (result, Utc::now()));
    }

    pub fn live_value(&self, id: Id) -> Option<LiveValue> {
        self.live_values.lock().get(&id).cloned()
    }

    pub fn live_values(&self) -> FxHashMap<Id, LiveValue> {
        self.live_values.lock().clone()
    }

    pub fn stored_result_count(&self) -> usize {
        self.results.lock().len()
    }

    /// Toplevels traced so far, in the order they first ran.
    pub fn traced_tlids(&self) -> Vec<Tlid> {
        self.tlids.lock().clone()
    }
}

#[async_trait::async_trait]
impl TraceStore for InMemoryTraceStore {
    async fn load_result(&self, site: &FnCallSite, arg_hash: &str) -> Option<(Dval, DateTime<Utc>)> {
        self.results
            .lock()
            .get(&(site.clone(), arg_hash.to_string()))
            .cloned()
    }

    async fn store_result(&self, site: &FnCallSite, arg_hash: &str, _args: &[Dval], result: &Dval) {
        self.record_result(site.clone(), arg_hash, result.clone());
    }

    fn trace_dval(&self, on_execution_path: bool, id: Id, dval: &Dval) {
        self.live_values.lock().insert(
            id,
            LiveValue {
                dval: dval.clone(),
                executed: on_execution_path,
            },
        );
    }

    fn trace_tlid(&self, tlid: Tlid) {
        let mut tlids = self.tlids.lock();
        if !tlids.contains(&tlid) {
            tlids.push(tlid);
        }
    }
}

/// Wraps another store, keeping its own copy of every live value.
///
/// Used by analysis, which needs the live values of one run while results
/// still flow to and from the caller's store.
pub(crate) struct RecordingTraceStore {
    inner: Arc<dyn TraceStore>,
    live_values: Mutex<FxHashMap<Id, LiveValue>>,
}

impl RecordingTraceStore {
    pub(crate) fn new(inner: Arc<dyn TraceStore>) -> Self {
        RecordingTraceStore {
            inner,
            live_values: Mutex::default(),
        }
    }

    pub(crate) fn take_live_values(&self) -> FxHashMap<Id, LiveValue> {
        std::mem::take(&mut *self.live_values.lock())
    }
}

#[async_trait::async_trait]
impl TraceStore for RecordingTraceStore {
    async fn load_result(&self, site: &FnCallSite, arg_hash: &str) -> Option<(Dval, DateTime<Utc>)> {
        self.inner.load_result(site, arg_hash).await
    }

    async fn store_result(&self, site: &FnCallSite, arg_hash: &str, args: &[Dval], result: &Dval) {
        self.inner.store_result(site, arg_hash, args, result).await;
    }

    fn trace_dval(&self, on_execution_path: bool, id: Id, dval: &Dval) {
        self.live_values.lock().insert(
            id,
            LiveValue {
                dval: dval.clone(),
                executed: on_execution_path,
            },
        );
        self.inner.trace_dval(on_execution_path, id, dval);
    }

    fn trace_tlid(&self, tlid: Tlid) {
        self.inner.trace_tlid(tlid);
    }
}
