use std::net::ToSocketAddrs;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::channel::codec::JsonCodec;
use crate::protocol::error::{FramewireError, Result};
use crate::protocol::BridgeMessage;

/// Maximum accepted message size (16 MB). Bridge traffic is call payloads
/// and registrations; anything larger is a framing error or an attack.
const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Async TCP carrier for bridge messages.
///
/// Unlike a request/response transport there is no pairing at this layer:
/// each side sends and receives independent messages, and the call
/// dispatcher correlates results to requests by call id.
///
/// # Wire Protocol
///
/// Messages are sent with a 4-byte length prefix (big-endian u32) followed
/// by the JSON-encoded data:
///
/// ```text
/// [4-byte length] [JSON data]
/// ```
pub struct BridgeStream {
    stream: TcpStream,
}

impl BridgeStream {
    /// Connects to a remote endpoint.
    ///
    /// The address may resolve to multiple socket addresses; each is tried
    /// until one succeeds.
    pub async fn connect(addr: &str) -> Result<BridgeStream> {
        let socket_addrs = addr
            .to_socket_addrs()
            .map_err(|e| FramewireError::Transport(format!("Invalid address '{}': {}", addr, e)))?;

        let mut last_err = None;
        for socket_addr in socket_addrs {
            match TcpStream::connect(&socket_addr).await {
                Ok(stream) => return Ok(BridgeStream { stream }),
                Err(e) => last_err = Some(e),
            }
        }

        Err(FramewireError::Transport(format!(
            "Failed to connect to {}: {}",
            addr,
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string())
        )))
    }

    /// Sends one framed message.
    pub async fn send(&mut self, message: &BridgeMessage) -> Result<()> {
        let encoded = JsonCodec::encode(message)?;
        let len = encoded.len() as u32;
        tracing::trace!(bytes = len, "sending framed message");

        self.stream
            .write_all(&len.to_be_bytes())
            .await
            .map_err(|e| Self::map_io_error(e, "writing length prefix"))?;
        self.stream
            .write_all(&encoded)
            .await
            .map_err(|e| Self::map_io_error(e, "writing data"))?;
        self.stream
            .flush()
            .await
            .map_err(|e| Self::map_io_error(e, "flushing stream"))?;

        Ok(())
    }

    /// Receives the next framed message.
    pub async fn recv(&mut self) -> Result<BridgeMessage> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| Self::map_io_error(e, "reading length prefix"))?;

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_MESSAGE_SIZE {
            return Err(FramewireError::Transport(format!(
                "Message too large: {} bytes (max {} bytes)",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        self.stream
            .read_exact(&mut buf)
            .await
            .map_err(|e| Self::map_io_error(e, "reading data"))?;

        JsonCodec::decode(&buf)
    }

    fn map_io_error(err: std::io::Error, context: &str) -> FramewireError {
        match err.kind() {
            std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::NotConnected => {
                FramewireError::Transport(format!("{}: Connection lost", context))
            }
            _ => FramewireError::Io(err),
        }
    }
}

/// Listening side of the TCP carrier.
pub struct BridgeListener {
    listener: TcpListener,
}

impl BridgeListener {
    /// Binds to `addr` (use port 0 for an ephemeral port).
    pub async fn bind(addr: &str) -> Result<BridgeListener> {
        let listener = TcpListener::bind(addr).await?;
        Ok(BridgeListener { listener })
    }

    /// The bound local address, for handing to the connecting side.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts one incoming bridge connection.
    pub async fn accept(&self) -> Result<BridgeStream> {
        let (stream, _) = self.listener.accept().await?;
        Ok(BridgeStream { stream })
    }
}
