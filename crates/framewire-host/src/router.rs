use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use framewire_common::protocol::{
    BridgeMessage, CallArgs, CallRequest, CallResult, FramewireError, ObjectRegistration, Result,
};

type Handler = Box<dyn Fn(CallArgs) -> std::result::Result<CallArgs, String> + Send + Sync>;

/// A host-implemented object: a global name plus its method handlers.
///
/// Method order is preserved; it becomes the method list script code sees
/// on the materialized object.
pub struct HostObject {
    name: String,
    methods: Vec<String>,
    handlers: HashMap<String, Handler>,
}

impl HostObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Adds a method. A handler returns either a result value or an
    /// exception text that will reject the caller's promise. Re-adding a
    /// name replaces the handler but keeps its original position.
    pub fn method(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(CallArgs) -> std::result::Result<CallArgs, String> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        if !self.handlers.contains_key(&name) {
            self.methods.push(name.clone());
        }
        self.handlers.insert(name, Box::new(handler));
        self
    }

    fn registration(&self) -> ObjectRegistration {
        ObjectRegistration::new(&self.name, self.methods.iter().cloned())
    }
}

/// Owns the host's exposed objects, announces them to the render process
/// and answers its call requests.
pub struct HostRouter {
    objects: Mutex<HashMap<String, HostObject>>,
    outbound: UnboundedSender<BridgeMessage>,
}

impl HostRouter {
    pub fn new(outbound: UnboundedSender<BridgeMessage>) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            outbound,
        }
    }

    /// Records `object` and announces its registration. Returns whether it
    /// was newly published; a name that is already live is left untouched.
    pub fn publish(&self, object: HostObject) -> Result<bool> {
        let registration = object.registration();
        {
            let mut objects = self.objects.lock().unwrap();
            if objects.contains_key(&object.name) {
                tracing::warn!(object = %object.name, "already published, ignoring");
                return Ok(false);
            }
            objects.insert(object.name.clone(), object);
        }

        tracing::debug!(object = %registration.name, methods = registration.methods.len(), "publishing object");
        self.send(BridgeMessage::Registration(registration))?;
        Ok(true)
    }

    /// Withdraws `name` and announces the unregistration. Returns whether
    /// anything was withdrawn.
    pub fn revoke(&self, name: &str) -> Result<bool> {
        let removed = self.objects.lock().unwrap().remove(name).is_some();
        if removed {
            tracing::debug!(object = %name, "revoking object");
            self.send(BridgeMessage::Unregistration {
                name: name.to_string(),
            })?;
        }
        Ok(removed)
    }

    /// Routes one inbound render-process message.
    pub fn handle_message(&self, message: BridgeMessage) -> Result<()> {
        match message {
            BridgeMessage::CallRequest(request) => self.execute(request),
            other => {
                tracing::warn!(message = ?other, "host received unexpected message, dropping");
                Ok(())
            }
        }
    }

    /// Executes a call request and sends the result back. Unknown objects,
    /// unknown methods and handler failures all become error results for
    /// the caller's promise.
    fn execute(&self, request: CallRequest) -> Result<()> {
        let CallRequest {
            call_id,
            object,
            method,
            args,
        } = request;

        tracing::debug!(call_id, %object, %method, "executing call request");

        let outcome = {
            let objects = self.objects.lock().unwrap();
            match objects.get(&object) {
                None => Err(format!("unknown object '{}'", object)),
                Some(target) => match target.handlers.get(&method) {
                    None => Err(format!("'{}' has no method '{}'", object, method)),
                    Some(handler) => handler(args),
                },
            }
        };

        let result = match outcome {
            Ok(value) => CallResult::success(call_id, value),
            Err(message) => CallResult::error(call_id, message),
        };
        self.send(BridgeMessage::CallResult(result))
    }

    /// Drains `inbound` until the channel closes.
    pub async fn run(&self, mut inbound: UnboundedReceiver<BridgeMessage>) {
        while let Some(message) = inbound.recv().await {
            if let Err(err) = self.handle_message(message) {
                tracing::warn!(%err, "failed to handle inbound message");
            }
        }
        tracing::debug!("inbound message channel closed");
    }

    fn send(&self, message: BridgeMessage) -> Result<()> {
        self.outbound
            .send(message)
            .map_err(|_| FramewireError::ChannelClosed)
    }
}
