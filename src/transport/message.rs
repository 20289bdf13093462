use serde::Serialize;

/// Commands sent by the client to the stream server.
///
/// Every command carries the announcing client's id. Field order matches the
/// wire format the server expects, with `command` always first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command")]
pub enum Command {
    /// Identity announcement, sent once per connection as soon as it opens.
    #[serde(rename = "client_id")]
    Announce { client_id: String },

    /// Free text typed by the user.
    #[serde(rename = "message")]
    Message { client_id: String, data: String },

    /// Ask for the current value of a named stream.
    #[serde(rename = "request_stream_data")]
    RequestStream {
        client_id: String,
        stream_name: String,
    },

    /// Text to be relayed to every other connected client.
    #[serde(rename = "broadcast")]
    Broadcast { client_id: String, data: String },

    /// Register a new stream on the server.
    #[serde(rename = "start_stream")]
    StartStream {
        client_id: String,
        stream_name: String,
    },

    /// Push a value into a stream this client produces.
    #[serde(rename = "stream_data")]
    StreamData {
        client_id: String,
        stream_name: String,
        data: String,
    },

    /// Remove a stream from the server.
    #[serde(rename = "close_stream")]
    CloseStream {
        client_id: String,
        stream_name: String,
    },

    /// Text addressed to a single peer.
    #[serde(rename = "send_to_client")]
    SendToClient {
        client_id: String,
        target_id: String,
        data: String,
    },
}

impl Command {
    /// The wire tag for this command.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::Announce { .. } => "client_id",
            Command::Message { .. } => "message",
            Command::RequestStream { .. } => "request_stream_data",
            Command::Broadcast { .. } => "broadcast",
            Command::StartStream { .. } => "start_stream",
            Command::StreamData { .. } => "stream_data",
            Command::CloseStream { .. } => "close_stream",
            Command::SendToClient { .. } => "send_to_client",
        }
    }
}

/// Events pushed by the stream server, keyed by their `command` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Current value of a stream, as text.
    StreamData { stream_name: String, data: String },

    /// Text broadcast by the server or another client.
    Broadcast { data: String },

    /// Text the server sent to this client only.
    Direct { data: String },

    /// A peer message relayed by the server. `sender` is present when the
    /// peer included its own id.
    Relayed {
        sender: Option<String>,
        data: String,
    },

    /// The server asks the client to announce its identity.
    RequestId,

    /// The server is shutting down and will close the connection.
    ServerClosing,

    /// A `command` the client has no handler for, kept verbatim.
    Unknown { raw_command: String },

    /// Well-formed payload without a `command` field.
    Unrecognized,
}
