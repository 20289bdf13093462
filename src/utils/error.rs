//! The `error` module defines the error types used within `streamlink`.
//!
//! Every failure in the client is recoverable: the session reports it as a
//! diagnostic and stays in a well-defined state. These types describe what
//! went wrong for callers that want to react to it programmatically.

use thiserror::Error;

use crate::session::ConnectionState;

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs an open connection.
    #[error("not connected (connection is {state})")]
    NotConnected { state: ConnectionState },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised synchronously by a transport when a request cannot be queued.
///
/// Failures that happen after a request was accepted (handshake errors, broken
/// sockets) are reported through `TransportEvent::Error` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("a connection is already active on this transport")]
    AlreadyActive,

    #[error("transport is not open")]
    NotOpen,

    #[error("connection task has stopped")]
    ChannelClosed,

    #[error("no async runtime available to drive the connection")]
    NoRuntime,
}

/// Structural decoding failures for inbound payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not a JSON object.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A recognized command arrived without one of its required fields.
    #[error("`{command}` is missing required field `{field}`")]
    MissingField { command: String, field: &'static str },
}
