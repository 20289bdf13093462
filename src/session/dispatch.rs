//! Routing of decoded server events.
//!
//! [`dispatch`] is a pure function: it looks at the current subscription and
//! the decode outcome and says what should change and what the presentation
//! layer should be told. The session applies the result.

use crate::session::notification::{DiagnosticKind, Notification};
use crate::session::subscription::StreamSubscription;
use crate::transport::ServerEvent;
use crate::utils::DecodeError;

/// A state change the session must apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// New value for the subscribed stream.
    StreamValue(f64),
}

/// The outcome of routing one inbound payload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dispatch {
    pub mutation: Option<Mutation>,
    pub notification: Option<Notification>,
}

impl Dispatch {
    fn ignore() -> Self {
        Self::default()
    }

    fn notify(notification: Notification) -> Self {
        Self {
            mutation: None,
            notification: Some(notification),
        }
    }
}

pub fn dispatch(
    subscription: &StreamSubscription,
    decoded: Result<ServerEvent, DecodeError>,
) -> Dispatch {
    let event = match decoded {
        Ok(event) => event,
        Err(err @ DecodeError::Malformed(_)) => {
            return Dispatch::notify(Notification::diagnostic(
                DiagnosticKind::Malformed,
                err.to_string(),
            ));
        }
        Err(err @ DecodeError::MissingField { .. }) => {
            return Dispatch::notify(Notification::diagnostic(
                DiagnosticKind::MissingField,
                err.to_string(),
            ));
        }
    };

    match event {
        ServerEvent::StreamData { stream_name, data } => {
            if !subscription.matches(&stream_name) {
                return Dispatch::ignore();
            }
            match parse_value(&data) {
                Some(value) => Dispatch {
                    mutation: Some(Mutation::StreamValue(value)),
                    notification: Some(Notification::StreamValueUpdated { stream_name, value }),
                },
                None => Dispatch::notify(Notification::diagnostic(
                    DiagnosticKind::InvalidStreamData,
                    format!("stream '{stream_name}' sent non-numeric data: {data}"),
                )),
            }
        }
        ServerEvent::Broadcast { data } | ServerEvent::Direct { data } => {
            Dispatch::notify(Notification::Log(data))
        }
        ServerEvent::Relayed { sender, data } => {
            let text = match sender {
                Some(sender) => format!("{sender}: {data}"),
                None => data,
            };
            Dispatch::notify(Notification::Log(text))
        }
        ServerEvent::RequestId => Dispatch::notify(Notification::IdentityRequested),
        ServerEvent::ServerClosing => {
            Dispatch::notify(Notification::Log("Server is closing".to_string()))
        }
        ServerEvent::Unknown { raw_command } => Dispatch::notify(Notification::diagnostic(
            DiagnosticKind::UnknownCommand,
            format!("unknown command: {raw_command}"),
        )),
        ServerEvent::Unrecognized => Dispatch::notify(Notification::diagnostic(
            DiagnosticKind::Unrecognized,
            "message has no command field",
        )),
    }
}

/// Non-finite values are rejected along with non-numeric text.
fn parse_value(data: &str) -> Option<f64> {
    data.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
