//! Message carriers between the render and host processes.
//!
//! The bridge core itself only sees `tokio` mpsc endpoints carrying
//! [`BridgeMessage`](crate::protocol::BridgeMessage) values; how those
//! endpoints are backed is the embedder's choice. Two carriers ship here:
//!
//! - [`MessagePipe`]: an in-process duplex pair, for tests and
//!   single-process embedding.
//! - [`BridgeStream`] / [`BridgeListener`]: an async TCP channel with
//!   `[4-byte length prefix as u32 big-endian] + [JSON data]` framing.

pub mod codec;
pub mod pipe;
pub mod tcp;

pub use codec::JsonCodec;
pub use pipe::MessagePipe;
pub use tcp::{BridgeListener, BridgeStream};
