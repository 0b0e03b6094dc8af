use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use framewire_common::protocol::{BridgeMessage, ObjectRegistration};

use crate::bindwait::BindWaitTable;
use crate::dispatcher::CallDispatcher;
use crate::engine::ScriptEngine;
use crate::lifecycle::ContextLifecycleManager;
use crate::registry::RegistryStore;

/// Renderer-side entry point: wires the registry, pending-call table,
/// dispatcher and lifecycle manager to an inbound/outbound message
/// channel.
///
/// Cheap to clone; clones share all state, so one clone can run the
/// inbound pump while another serves the embedding layer's lifecycle
/// hooks.
pub struct ScriptBridge<E: ScriptEngine> {
    dispatcher: CallDispatcher<E>,
    lifecycle: Arc<ContextLifecycleManager<E>>,
    registry: Arc<RegistryStore>,
    bind_waits: Arc<BindWaitTable>,
}

impl<E: ScriptEngine> Clone for ScriptBridge<E> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            lifecycle: Arc::clone(&self.lifecycle),
            registry: Arc::clone(&self.registry),
            bind_waits: Arc::clone(&self.bind_waits),
        }
    }
}

impl<E: ScriptEngine> ScriptBridge<E> {
    /// Builds the bridge around `engine`. Outbound messages are emitted on
    /// `outbound`; inbound messages are fed through
    /// [`handle_message`](Self::handle_message) or the
    /// [`run`](Self::run) pump.
    pub fn new(engine: Arc<E>, outbound: UnboundedSender<BridgeMessage>) -> Self {
        let registry = Arc::new(RegistryStore::new());
        let bind_waits = Arc::new(BindWaitTable::new());
        let dispatcher = CallDispatcher::new(Arc::clone(&engine), outbound);
        let lifecycle = Arc::new(ContextLifecycleManager::new(
            engine,
            Arc::clone(&registry),
            Arc::clone(&bind_waits),
            dispatcher.clone(),
        ));

        Self {
            dispatcher,
            lifecycle,
            registry,
            bind_waits,
        }
    }

    /// Future resolving to `true` once `name` is callable in a main
    /// context. Awaiting before or after the registration arrives yields
    /// the same eventual result.
    pub fn bind(&self, name: &str) -> impl Future<Output = bool> + Send + 'static {
        self.bind_waits.wait_for_bind(name)
    }

    /// Synchronously removes `name` from the current main context and the
    /// registry.
    pub fn unbind(&self, name: &str) {
        self.lifecycle.apply_unregistration(name);
    }

    /// Lifecycle hook: a script context was created.
    pub fn on_context_created(&self, ctx: &E::Context, is_main: bool) {
        self.lifecycle.on_context_created(ctx, is_main);
    }

    /// Lifecycle hook: a script context is being torn down.
    pub fn on_context_released(&self, ctx: &E::Context, is_main: bool) {
        self.lifecycle.on_context_released(ctx, is_main);
    }

    /// Routes one inbound host-process message.
    pub fn handle_message(&self, message: BridgeMessage) {
        match message {
            BridgeMessage::Registration(info) => self.lifecycle.apply_registration(info),
            BridgeMessage::Unregistration { name } => self.lifecycle.apply_unregistration(&name),
            BridgeMessage::CallResult(result) => self.dispatcher.handle_call_result(result),
            BridgeMessage::CallRequest(request) => {
                tracing::warn!(
                    call_id = request.call_id,
                    "renderer received a call request, dropping"
                );
            }
        }
    }

    /// Drains `inbound` until the channel closes.
    pub async fn run(&self, mut inbound: UnboundedReceiver<BridgeMessage>) {
        while let Some(message) = inbound.recv().await {
            self.handle_message(message);
        }
        tracing::debug!("inbound message channel closed");
    }

    /// Dispatcher handle, for engine glue that installs call-forwarding
    /// callables outside of registry materialization.
    pub fn dispatcher(&self) -> CallDispatcher<E> {
        self.dispatcher.clone()
    }

    /// Number of in-flight calls.
    pub fn pending_calls(&self) -> usize {
        self.dispatcher.pending_calls()
    }

    /// Snapshot of the currently registered objects.
    pub fn registered_objects(&self) -> Vec<ObjectRegistration> {
        self.registry.snapshot()
    }
}
