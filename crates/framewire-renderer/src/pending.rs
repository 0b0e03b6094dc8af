use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use framewire_common::protocol::{CallId, FramewireError, Result};

use crate::engine::ContextHandle;

/// A dispatched call awaiting its result.
///
/// Owns the native promise handle; holds a non-owning context handle used
/// only for identity comparison and forced release.
pub struct PendingCall<P, C> {
    pub promise: P,
    pub context: C,
}

/// Correlates outbound call ids to their awaiting promise handles.
///
/// Also owns the id counter: ids are process-wide, monotonically
/// increasing and never reused. A `u64` cannot realistically wrap within a
/// process lifetime, so there is no wraparound handling.
pub struct PendingCallTable<P, C: ContextHandle> {
    next_id: AtomicU64,
    entries: Mutex<HashMap<CallId, PendingCall<P, C>>>,
}

impl<P, C: ContextHandle> PendingCallTable<P, C> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Allocates the next call id.
    pub fn allocate_id(&self) -> CallId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Inserts a pending entry. An occupied slot means the id counter is
    /// broken; the existing entry is left untouched and `DuplicateCallId`
    /// returned for the caller to escalate.
    pub fn insert(&self, call_id: CallId, call: PendingCall<P, C>) -> Result<()> {
        match self.entries.lock().unwrap().entry(call_id) {
            Entry::Occupied(_) => Err(FramewireError::DuplicateCallId(call_id)),
            Entry::Vacant(slot) => {
                slot.insert(call);
                Ok(())
            }
        }
    }

    /// Atomically removes and returns the entry for `call_id`. Whichever
    /// of result delivery and context teardown wins this removal performs
    /// the only settlement.
    pub fn remove(&self, call_id: CallId) -> Option<PendingCall<P, C>> {
        self.entries.lock().unwrap().remove(&call_id)
    }

    /// Removes and returns every entry. Main-frame teardown invalidates
    /// the whole script world, so ownership is not checked.
    pub fn drain_all(&self) -> Vec<PendingCall<P, C>> {
        let mut entries = self.entries.lock().unwrap();
        entries.drain().map(|(_, call)| call).collect()
    }

    /// Removes and returns the entries owned by `ctx`, matched by native
    /// identity.
    pub fn drain_context(&self, ctx: &C) -> Vec<PendingCall<P, C>> {
        let mut entries = self.entries.lock().unwrap();
        let ids: Vec<CallId> = entries
            .iter()
            .filter(|(_, call)| call.context.same_as(ctx))
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter().filter_map(|id| entries.remove(&id)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P, C: ContextHandle> Default for PendingCallTable<P, C> {
    fn default() -> Self {
        Self::new()
    }
}
