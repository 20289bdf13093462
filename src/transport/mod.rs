//! The `transport` module is responsible for talking to the stream server.
//!
//! It defines the messaging protocol (`message`), its JSON encoding
//! (`codec`), the [`Transport`] interface the session drives, and a
//! WebSocket implementation of that interface (`websocket`).
//!
//! A transport never blocks its caller. `connect`, `send_text` and `close`
//! only queue a request; the outcome arrives later as a [`TransportEvent`]
//! on the channel handed to `connect`, in the order it happened on the wire.

pub mod codec;
pub mod message;
pub mod websocket;

use tokio::sync::mpsc::UnboundedSender;

use crate::utils::TransportError;

pub use codec::{decode, encode};
pub use message::{Command, ServerEvent};
pub use websocket::WebSocketTransport;

/// Notifications emitted by a transport for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The handshake completed and frames can flow.
    Opened,
    /// The connection failed or broke. Terminal for this connection.
    Error(String),
    /// The connection closed, with the peer's close code when one was sent.
    /// Terminal for this connection.
    Closed(Option<u16>),
    /// A data frame from the peer.
    Message(Vec<u8>),
}

/// The socket abstraction a session owns exclusively.
pub trait Transport {
    /// Starts connecting to `url`. Progress is reported on `events`.
    fn connect(
        &mut self,
        url: &str,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<(), TransportError>;

    /// Queues a text frame on the current connection.
    fn send_text(&mut self, payload: String) -> Result<(), TransportError>;

    /// Starts the closing handshake. `TransportEvent::Closed` follows.
    fn close(&mut self) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests;
