//! JSON codec for the stream protocol.
//!
//! Outbound commands are flat objects whose values are all strings. Inbound
//! payloads are read into a string-to-string map first and only then
//! interpreted, so unexpected fields never cause a failure.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::transport::message::{Command, ServerEvent};
use crate::utils::DecodeError;

/// Serializes a command into the text frame sent to the server.
pub fn encode(command: &Command) -> serde_json::Result<String> {
    serde_json::to_string(command)
}

/// Decodes a payload received from the server.
///
/// Only a payload that is not a JSON object at all, or a known command that
/// lacks a required field, is an error. A missing `command` yields
/// [`ServerEvent::Unrecognized`] and an unhandled one [`ServerEvent::Unknown`].
pub fn decode(payload: &[u8]) -> Result<ServerEvent, DecodeError> {
    let object: Map<String, Value> =
        serde_json::from_slice(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let mut fields: HashMap<String, String> = object
        .into_iter()
        .filter_map(|(key, value)| as_text(value).map(|text| (key, text)))
        .collect();

    let Some(command) = fields.remove("command") else {
        return Ok(ServerEvent::Unrecognized);
    };

    let event = match command.as_str() {
        "stream_data" => ServerEvent::StreamData {
            stream_name: required(&mut fields, &command, "stream_name")?,
            data: required(&mut fields, &command, "data")?,
        },
        "broadcast" => ServerEvent::Broadcast {
            data: required(&mut fields, &command, "data")?,
        },
        "message" => ServerEvent::Direct {
            data: required(&mut fields, &command, "data")?,
        },
        "send_to_client" => ServerEvent::Relayed {
            sender: fields.remove("client_id"),
            data: required(&mut fields, &command, "data")?,
        },
        "REQUEST_ID" => ServerEvent::RequestId,
        "SERVER_CLOSING" => ServerEvent::ServerClosing,
        _ => ServerEvent::Unknown {
            raw_command: command,
        },
    };

    Ok(event)
}

/// Scalars are accepted as text; null, arrays and objects count as absent.
fn as_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn required(
    fields: &mut HashMap<String, String>,
    command: &str,
    field: &'static str,
) -> Result<String, DecodeError> {
    fields.remove(field).ok_or_else(|| DecodeError::MissingField {
        command: command.to_string(),
        field,
    })
}
