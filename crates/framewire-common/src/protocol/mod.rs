pub mod error;
pub mod messages;


pub use error::{FramewireError, Result};
pub use messages::{BridgeMessage, CallArgs, CallId, CallRequest, CallResult, ObjectRegistration};
