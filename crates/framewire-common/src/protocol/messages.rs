//! Framewire message set.
//!
//! Every message crossing the process boundary is one [`BridgeMessage`]
//! variant. Registration traffic flows host→render, call requests flow
//! render→host, and call results flow back host→render. One call per
//! message; there is no batching or multiplexing.

use serde::{Deserialize, Serialize};

/// Process-wide unique integer correlating an outbound call with its
/// eventual result. Never reused within a process lifetime.
pub type CallId = u64;

/// Arguments and results cross the bridge as JSON values; the script
/// engine seam converts them to and from script values.
pub type CallArgs = serde_json::Value;

/// An exposed object: its global name and the ordered list of methods it
/// makes callable. Immutable once constructed; at most one live
/// registration per name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRegistration {
    pub name: String,
    pub methods: Vec<String>,
}

impl ObjectRegistration {
    pub fn new(
        name: impl Into<String>,
        methods: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }
}

/// A render→host call request for one method invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRequest {
    pub call_id: CallId,
    pub object: String,
    pub method: String,
    pub args: CallArgs,
}

/// A host→render result for a previously dispatched call.
///
/// Exactly one of `result` / `error` is meaningful, selected by `success`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallResult {
    pub call_id: CallId,
    pub success: bool,
    pub result: Option<CallArgs>,
    pub error: Option<String>,
}

impl CallResult {
    /// Creates a successful result carrying `result`.
    pub fn success(call_id: CallId, result: CallArgs) -> Self {
        CallResult {
            call_id,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a failed result carrying the host-side exception text.
    pub fn error(call_id: CallId, error: impl Into<String>) -> Self {
        CallResult {
            call_id,
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Collapses the wire shape into fulfill-or-reject form.
    pub fn into_outcome(self) -> std::result::Result<CallArgs, String> {
        if self.success {
            Ok(self.result.unwrap_or(CallArgs::Null))
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "unknown remote error".to_string()))
        }
    }
}

/// Envelope for every named message exchanged between the processes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeMessage {
    /// host→render: expose an object to script code.
    Registration(ObjectRegistration),
    /// host→render: withdraw a previously exposed object.
    Unregistration { name: String },
    /// render→host: invoke a method on an exposed object.
    CallRequest(CallRequest),
    /// host→render: settle a pending call.
    CallResult(CallResult),
}
