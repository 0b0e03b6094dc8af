//! The script-engine seam.
//!
//! The core never touches engine internals. It holds opaque context and
//! promise handles and asks the engine to act on them through this trait,
//! entering the context for the duration of each call and never across an
//! asynchronous gap.

use framewire_common::protocol::{CallArgs, ObjectRegistration};

use crate::dispatcher::CallDispatcher;

/// Non-owning handle to a script execution context (one per frame).
///
/// Handles are cheap to clone; clones refer to the same native context.
pub trait ContextHandle: Clone + Send + Sync + 'static {
    /// Identity comparison: same native context, not value equality.
    fn same_as(&self, other: &Self) -> bool;

    /// Whether the native backing still exists and can be entered.
    fn is_alive(&self) -> bool;
}

/// The engine capability surface the dispatch core relies on.
///
/// `fulfill`, `reject` and `install_object` enter the given context for
/// the duration of the call. `discard` is the abandonment path: it
/// disposes the native promise handle without invoking any continuation,
/// which is how a call whose context is gone gets released.
pub trait ScriptEngine: Send + Sync + Sized + 'static {
    type Context: ContextHandle;

    /// Native promise handle. Clones refer to the same underlying promise;
    /// one stays in the pending-call table, one is returned to the script
    /// caller.
    type Promise: Clone + Send + 'static;

    /// Creates a promise bound to `ctx`. Returns `None` when the context
    /// has no active script frame to anchor the promise in.
    fn create_promise(&self, ctx: &Self::Context) -> Option<Self::Promise>;

    /// Enters `ctx` and fulfills `promise` with `value` converted to a
    /// script value.
    fn fulfill(&self, ctx: &Self::Context, promise: Self::Promise, value: CallArgs);

    /// Enters `ctx` and rejects `promise` with an error built from the
    /// exception text.
    fn reject(&self, ctx: &Self::Context, promise: Self::Promise, error: &str);

    /// Disposes the promise handle without settling it.
    fn discard(&self, promise: Self::Promise);

    /// Installs `registration` as a global object in `ctx`: one callable
    /// per method name, each forwarding to
    /// [`CallDispatcher::dispatch_call`] with its captured
    /// `(object, method)` pair. Returns whether the installation was
    /// applied; a context that can no longer be entered yields `false`.
    fn install_object(
        &self,
        ctx: &Self::Context,
        registration: &ObjectRegistration,
        dispatcher: &CallDispatcher<Self>,
    ) -> bool;

    /// Deletes the named global from `ctx`. Returns whether anything was
    /// removed; a dead context yields `false`.
    fn remove_object(&self, ctx: &Self::Context, name: &str) -> bool;
}
