use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use framewire_common::protocol::{
    BridgeMessage, CallArgs, CallRequest, CallResult, FramewireError, Result,
};

use crate::engine::{ContextHandle, ScriptEngine};
use crate::pending::{PendingCall, PendingCallTable};

/// Turns script-side invocations into outbound messages and pending
/// entries, and inbound result messages into settled promises.
///
/// Cheap to clone; clones share the same pending-call table and outbound
/// channel. Engine glue holds a clone in each installed method callable.
pub struct CallDispatcher<E: ScriptEngine> {
    inner: Arc<DispatcherInner<E>>,
}

struct DispatcherInner<E: ScriptEngine> {
    engine: Arc<E>,
    pending: PendingCallTable<E::Promise, E::Context>,
    outbound: UnboundedSender<BridgeMessage>,
}

impl<E: ScriptEngine> Clone for CallDispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: ScriptEngine> CallDispatcher<E> {
    pub fn new(engine: Arc<E>, outbound: UnboundedSender<BridgeMessage>) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                engine,
                pending: PendingCallTable::new(),
                outbound,
            }),
        }
    }

    /// The single generic call-forwarding entry point: every script-visible
    /// method callable funnels through here with its captured
    /// `(object, method)` pair.
    ///
    /// Returns the promise handle the script caller awaits. The call is
    /// asynchronous by construction; nothing blocks, and the promise is the
    /// only suspension point.
    pub fn dispatch_call(
        &self,
        object: &str,
        method: &str,
        args: CallArgs,
        ctx: &E::Context,
    ) -> Result<E::Promise> {
        let inner = &self.inner;

        let Some(promise) = inner.engine.create_promise(ctx) else {
            tracing::debug!(object, method, "call without an active script frame");
            return Err(FramewireError::NoActiveFrame {
                object: object.to_string(),
                method: method.to_string(),
            });
        };

        let call_id = inner.pending.allocate_id();

        // An occupied slot can only mean a broken counter. Escalate instead
        // of overwriting the live entry.
        if let Err(err) = inner.pending.insert(
            call_id,
            PendingCall {
                promise: promise.clone(),
                context: ctx.clone(),
            },
        ) {
            tracing::error!(call_id, "call id collision, aborting dispatch");
            inner.engine.discard(promise);
            return Err(err);
        }

        let request = CallRequest {
            call_id,
            object: object.to_string(),
            method: method.to_string(),
            args,
        };
        tracing::debug!(call_id, object, method, "dispatching call");

        if inner
            .outbound
            .send(BridgeMessage::CallRequest(request))
            .is_err()
        {
            // The host is gone; the call can never be answered. Undo the
            // entry so nothing leaks.
            if let Some(call) = inner.pending.remove(call_id) {
                inner.engine.discard(call.promise);
            }
            return Err(FramewireError::ChannelClosed);
        }

        Ok(promise)
    }

    /// Settles the pending call named by `result`, if it is still live.
    ///
    /// Unknown ids are expected (already settled, or torn down with their
    /// context) and dropped without complaint. A call whose owning context
    /// died between dispatch and reply is abandoned rather than settled.
    pub fn handle_call_result(&self, result: CallResult) {
        let call_id = result.call_id;

        let Some(call) = self.inner.pending.remove(call_id) else {
            tracing::trace!(call_id, "stale call result, dropping");
            return;
        };

        if !call.context.is_alive() {
            tracing::debug!(call_id, "owning context gone, abandoning call");
            self.inner.engine.discard(call.promise);
            return;
        }

        match result.into_outcome() {
            Ok(value) => {
                tracing::debug!(call_id, "fulfilling call");
                self.inner.engine.fulfill(&call.context, call.promise, value);
            }
            Err(message) => {
                tracing::debug!(call_id, "rejecting call with remote exception");
                self.inner
                    .engine
                    .reject(&call.context, call.promise, &message);
            }
        }
    }

    /// Abandons every pending call. Used on main-frame teardown, which
    /// invalidates the whole script world.
    pub fn abandon_all(&self) {
        let calls = self.inner.pending.drain_all();
        if !calls.is_empty() {
            tracing::debug!(count = calls.len(), "abandoning all pending calls");
        }
        for call in calls {
            self.inner.engine.discard(call.promise);
        }
    }

    /// Abandons the pending calls owned by `ctx`, matched by native
    /// identity.
    pub fn abandon_context(&self, ctx: &E::Context) {
        let calls = self.inner.pending.drain_context(ctx);
        if !calls.is_empty() {
            tracing::debug!(count = calls.len(), "abandoning calls of released context");
        }
        for call in calls {
            self.inner.engine.discard(call.promise);
        }
    }

    /// Number of in-flight calls.
    pub fn pending_calls(&self) -> usize {
        self.inner.pending.len()
    }
}
