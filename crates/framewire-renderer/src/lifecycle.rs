use std::sync::{Arc, Mutex};

use framewire_common::protocol::ObjectRegistration;

use crate::bindwait::BindWaitTable;
use crate::dispatcher::CallDispatcher;
use crate::engine::{ContextHandle, ScriptEngine};
use crate::registry::RegistryStore;

/// Re-materializes registered objects into newly created script contexts
/// and forcibly releases pending calls when a context is torn down.
///
/// Exposed objects are main-frame-scoped: only the main context receives
/// materialization, and only one main context is tracked at a time. This
/// is intentional, not an omission.
pub struct ContextLifecycleManager<E: ScriptEngine> {
    engine: Arc<E>,
    registry: Arc<RegistryStore>,
    bind_waits: Arc<BindWaitTable>,
    dispatcher: CallDispatcher<E>,
    main_context: Mutex<Option<E::Context>>,
}

impl<E: ScriptEngine> ContextLifecycleManager<E> {
    pub fn new(
        engine: Arc<E>,
        registry: Arc<RegistryStore>,
        bind_waits: Arc<BindWaitTable>,
        dispatcher: CallDispatcher<E>,
    ) -> Self {
        Self {
            engine,
            registry,
            bind_waits,
            dispatcher,
            main_context: Mutex::new(None),
        }
    }

    /// A new main-frame context becomes the materialization target and
    /// receives every recorded registration. Non-main contexts receive
    /// nothing.
    pub fn on_context_created(&self, ctx: &E::Context, is_main: bool) {
        if !is_main {
            return;
        }

        *self.main_context.lock().unwrap() = Some(ctx.clone());

        let snapshot = self.registry.snapshot();
        if !snapshot.is_empty() {
            tracing::debug!(
                objects = snapshot.len(),
                "materializing registry into new main context"
            );
        }
        self.materialize(&snapshot, ctx);
    }

    /// Releases every pending call that can no longer receive a reply.
    ///
    /// Destroying the main context invalidates the whole script world, so
    /// it abandons all calls regardless of owner; a child context only
    /// takes its own calls down with it.
    pub fn on_context_released(&self, ctx: &E::Context, is_main: bool) {
        if is_main {
            {
                let mut main = self.main_context.lock().unwrap();
                if main.as_ref().is_some_and(|m| m.same_as(ctx)) {
                    *main = None;
                }
            }
            self.dispatcher.abandon_all();
        } else {
            self.dispatcher.abandon_context(ctx);
        }
    }

    /// Installs each registration into `ctx` and signals its bind waiters
    /// on success. A context that can no longer be entered leaves the
    /// registrations recorded but unapplied; a future context picks them
    /// up.
    pub fn materialize(&self, infos: &[ObjectRegistration], ctx: &E::Context) {
        for info in infos {
            if !ctx.is_alive() {
                tracing::debug!(object = %info.name, "context gone, registration not applied");
                continue;
            }
            if self.engine.install_object(ctx, info, &self.dispatcher) {
                tracing::debug!(object = %info.name, "object materialized");
                self.bind_waits.signal_bound(&info.name);
            } else {
                tracing::debug!(object = %info.name, "object installation not applied");
            }
        }
    }

    /// Handles a host-side registration request: record it, and if a main
    /// context is live, materialize immediately.
    pub fn apply_registration(&self, info: ObjectRegistration) {
        if !self.registry.register(info.clone()) {
            tracing::warn!(object = %info.name, "duplicate registration ignored");
            return;
        }

        let main = self.main_context.lock().unwrap().clone();
        if let Some(ctx) = main {
            self.materialize(std::slice::from_ref(&info), &ctx);
        }
    }

    /// Removes `name` from the registry and, when the context is still
    /// enterable, deletes the corresponding global.
    pub fn delete_object(&self, name: &str, ctx: Option<&E::Context>) -> Option<ObjectRegistration> {
        let removed = self.registry.unregister(name);
        if removed.is_some() {
            if let Some(ctx) = ctx {
                if ctx.is_alive() {
                    self.engine.remove_object(ctx, name);
                }
            }
        }
        removed
    }

    /// Handles a host-side unregistration request against the current main
    /// context.
    pub fn apply_unregistration(&self, name: &str) {
        let main = self.main_context.lock().unwrap().clone();
        if self.delete_object(name, main.as_ref()).is_none() {
            tracing::debug!(object = %name, "unregistration for unknown object");
        }
    }

    /// The currently tracked main context, if any.
    pub fn main_context(&self) -> Option<E::Context> {
        self.main_context.lock().unwrap().clone()
    }
}
