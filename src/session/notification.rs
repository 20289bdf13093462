use std::fmt;

use crate::session::ConnectionState;

/// What kind of problem a [`Notification::Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    NotConnected,
    AlreadyConnected,
    Malformed,
    MissingField,
    Unrecognized,
    UnknownCommand,
    InvalidStreamData,
    Transport,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::NotConnected => "not connected",
            DiagnosticKind::AlreadyConnected => "already connected",
            DiagnosticKind::Malformed => "malformed message",
            DiagnosticKind::MissingField => "missing field",
            DiagnosticKind::Unrecognized => "unrecognized message",
            DiagnosticKind::UnknownCommand => "unknown command",
            DiagnosticKind::InvalidStreamData => "invalid stream data",
            DiagnosticKind::Transport => "transport error",
        };
        f.write_str(name)
    }
}

/// Events the session emits for the presentation layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Free text worth showing to the user.
    Log(String),
    /// The subscribed stream has a new value.
    StreamValueUpdated { stream_name: String, value: f64 },
    /// Something went wrong; the session has already recovered.
    Diagnostic { kind: DiagnosticKind, detail: String },
    /// The server asked the client to announce itself again.
    IdentityRequested,
    StateChanged(ConnectionState),
}

impl Notification {
    pub fn diagnostic(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Notification::Diagnostic {
            kind,
            detail: detail.into(),
        }
    }
}
