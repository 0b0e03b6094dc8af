use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::protocol::error::{FramewireError, Result};
use crate::protocol::BridgeMessage;

/// One end of an in-process duplex message channel.
///
/// A pair of pipes stands in for the real inter-process transport when
/// both sides live in one process, which is also how the test suite wires
/// a renderer bridge to a host router.
pub struct MessagePipe {
    sender: UnboundedSender<BridgeMessage>,
    receiver: UnboundedReceiver<BridgeMessage>,
}

impl MessagePipe {
    /// Creates a connected pair. Messages sent on one end arrive on the
    /// other, in order.
    pub fn pair() -> (MessagePipe, MessagePipe) {
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        (
            MessagePipe {
                sender: tx_a,
                receiver: rx_b,
            },
            MessagePipe {
                sender: tx_b,
                receiver: rx_a,
            },
        )
    }

    /// Sends a message to the peer end.
    pub fn send(&self, message: BridgeMessage) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| FramewireError::ChannelClosed)
    }

    /// Receives the next message from the peer end. `None` once the peer is
    /// dropped and the buffer is drained.
    pub async fn recv(&mut self) -> Option<BridgeMessage> {
        self.receiver.recv().await
    }

    /// Splits into raw mpsc endpoints, the shape the bridge and router
    /// constructors take.
    pub fn split(self) -> (UnboundedSender<BridgeMessage>, UnboundedReceiver<BridgeMessage>) {
        (self.sender, self.receiver)
    }
}
