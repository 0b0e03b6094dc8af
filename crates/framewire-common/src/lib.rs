//! Shared protocol types and message carriers for framewire.
//!
//! The render process and the privileged host process talk to each other
//! through named messages ([`protocol::BridgeMessage`]) carried over an
//! opaque transport. This crate defines the message set, the error
//! taxonomy, and two concrete carriers: an in-process pipe for tests and
//! same-process embedding, and a length-prefixed TCP channel.

pub mod channel;
pub mod protocol;
