//! Renderer-process core of framewire.
//!
//! Script code in the render process calls methods on objects implemented
//! in the privileged host process and awaits the results as ordinary
//! promises. This crate owns the dispatch and lifecycle machinery that
//! makes that safe:
//!
//! - [`RegistryStore`]: the process-wide table of exposed objects.
//! - [`BindWaitTable`]: futures resolving when a named object first
//!   becomes callable.
//! - [`PendingCallTable`]: correlates call ids to awaiting promises.
//! - [`CallDispatcher`]: script invocation → outbound message; inbound
//!   result → settled promise.
//! - [`ContextLifecycleManager`]: materializes registrations into new main
//!   contexts and forcibly releases calls when a context is torn down.
//! - [`ScriptBridge`]: the facade wiring it all to an inbound/outbound
//!   message channel.
//!
//! The script engine itself is external; the core is generic over the
//! [`ScriptEngine`] seam and only ever holds opaque promise and context
//! handles.

pub mod bindwait;
pub mod bridge;
pub mod dispatcher;
pub mod engine;
pub mod lifecycle;
pub mod pending;
pub mod registry;

pub use bindwait::BindWaitTable;
pub use bridge::ScriptBridge;
pub use dispatcher::CallDispatcher;
pub use engine::{ContextHandle, ScriptEngine};
pub use lifecycle::ContextLifecycleManager;
pub use pending::{PendingCall, PendingCallTable};
pub use registry::RegistryStore;
