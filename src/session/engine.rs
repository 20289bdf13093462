use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::client::ClientIdentity;
use crate::session::dispatch::{Mutation, dispatch};
use crate::session::notification::{DiagnosticKind, Notification};
use crate::session::state::ConnectionState;
use crate::session::subscription::StreamSubscription;
use crate::transport::{Command, Transport, TransportEvent, codec};
use crate::utils::SessionError;

/// Receiving ends handed to whoever drives a [`Session`].
///
/// `events` must be fed back into [`Session::handle_transport_event`];
/// `notifications` is what the presentation layer renders.
#[derive(Debug)]
pub struct SessionChannels {
    pub events: UnboundedReceiver<TransportEvent>,
    pub notifications: UnboundedReceiver<Notification>,
}

/// A client connection to the stream server.
///
/// The session exclusively owns its transport, its identity and its stream
/// subscription. All methods take `&mut self`, so one owner drives every
/// operation and every transport event in sequence.
#[derive(Debug)]
pub struct Session<T: Transport> {
    identity: ClientIdentity,
    transport: T,
    state: ConnectionState,
    subscription: StreamSubscription,
    events: UnboundedSender<TransportEvent>,
    notifier: UnboundedSender<Notification>,
}

impl<T: Transport> Session<T> {
    pub fn new(identity: ClientIdentity, transport: T) -> (Self, SessionChannels) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let session = Self {
            identity,
            transport,
            state: ConnectionState::Disconnected,
            subscription: StreamSubscription::default(),
            events: events_tx,
            notifier: notify_tx,
        };

        let channels = SessionChannels {
            events: events_rx,
            notifications: notify_rx,
        };

        (session, channels)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn subscription(&self) -> &StreamSubscription {
        &self.subscription
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Starts connecting to `endpoint`.
    ///
    /// Does nothing but warn while a connection is already being set up, open
    /// or closing, so a session never runs two transports at once.
    pub fn connect(&mut self, endpoint: &str) -> Result<(), SessionError> {
        if self.state.is_active() {
            warn!(
                "connect({endpoint}) ignored: connection is {}",
                self.state
            );
            self.notify(Notification::diagnostic(
                DiagnosticKind::AlreadyConnected,
                format!("connection is already {}", self.state),
            ));
            return Ok(());
        }

        info!("Connecting to {endpoint} as {}", self.identity);
        if let Err(e) = self.transport.connect(endpoint, self.events.clone()) {
            warn!("Transport refused to connect: {e}");
            self.notify(Notification::diagnostic(
                DiagnosticKind::Transport,
                e.to_string(),
            ));
            return Err(e.into());
        }

        self.set_state(ConnectionState::Connecting);
        Ok(())
    }

    /// Starts closing the connection. Does nothing when already disconnected
    /// or closing.
    pub fn disconnect(&mut self) {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::Closing => {
                debug!("disconnect() ignored: connection is {}", self.state);
            }
            ConnectionState::Connecting | ConnectionState::Open => {
                info!("Disconnecting");
                if let Err(e) = self.transport.close() {
                    // the terminal transport event is still on its way
                    warn!("Transport close failed: {e}");
                    self.notify(Notification::diagnostic(
                        DiagnosticKind::Transport,
                        e.to_string(),
                    ));
                }
                self.set_state(ConnectionState::Closing);
            }
        }
    }

    /// Sends text typed by the user.
    pub fn send_user_message(&mut self, text: &str) -> Result<(), SessionError> {
        let command = Command::Message {
            client_id: self.identity.to_string(),
            data: text.to_string(),
        };
        self.send(command)
    }

    /// Switches the subscription to `stream_name` and asks the server for
    /// its value. The previous stream is abandoned without notice.
    pub fn request_stream(&mut self, stream_name: &str) -> Result<(), SessionError> {
        let command = Command::RequestStream {
            client_id: self.identity.to_string(),
            stream_name: stream_name.to_string(),
        };
        self.send(command)?;
        self.subscription.replace(stream_name);
        Ok(())
    }

    /// Asks again for the subscribed stream's value. No-op without a
    /// subscription.
    pub fn refresh_stream(&mut self) -> Result<(), SessionError> {
        let Some(stream_name) = self.subscription.stream_name() else {
            return Ok(());
        };
        let command = Command::RequestStream {
            client_id: self.identity.to_string(),
            stream_name: stream_name.to_string(),
        };
        self.send(command)
    }

    /// Re-announces the client identity, e.g. after the server asked for it.
    pub fn announce(&mut self) -> Result<(), SessionError> {
        let command = Command::Announce {
            client_id: self.identity.to_string(),
        };
        self.send(command)
    }

    pub fn broadcast(&mut self, text: &str) -> Result<(), SessionError> {
        let command = Command::Broadcast {
            client_id: self.identity.to_string(),
            data: text.to_string(),
        };
        self.send(command)
    }

    pub fn send_to_client(&mut self, target_id: &str, text: &str) -> Result<(), SessionError> {
        let command = Command::SendToClient {
            client_id: self.identity.to_string(),
            target_id: target_id.to_string(),
            data: text.to_string(),
        };
        self.send(command)
    }

    /// Registers a stream this client will produce values for.
    pub fn start_stream(&mut self, stream_name: &str) -> Result<(), SessionError> {
        let command = Command::StartStream {
            client_id: self.identity.to_string(),
            stream_name: stream_name.to_string(),
        };
        self.send(command)
    }

    pub fn publish_stream_data(
        &mut self,
        stream_name: &str,
        value: &str,
    ) -> Result<(), SessionError> {
        let command = Command::StreamData {
            client_id: self.identity.to_string(),
            stream_name: stream_name.to_string(),
            data: value.to_string(),
        };
        self.send(command)
    }

    pub fn close_stream(&mut self, stream_name: &str) -> Result<(), SessionError> {
        let command = Command::CloseStream {
            client_id: self.identity.to_string(),
            stream_name: stream_name.to_string(),
        };
        self.send(command)
    }

    /// Applies one notification from the transport.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.on_opened(),
            TransportEvent::Error(message) => {
                if self.state == ConnectionState::Disconnected {
                    debug!("Stale transport error ignored: {message}");
                    return;
                }
                warn!("Transport error: {message}");
                self.notify(Notification::diagnostic(DiagnosticKind::Transport, message));
                self.on_terminated();
            }
            TransportEvent::Closed(code) => {
                if self.state == ConnectionState::Disconnected {
                    debug!("Stale close ignored");
                    return;
                }
                info!("Connection closed (code {code:?})");
                self.notify(Notification::Log("Connection closed!".to_string()));
                self.on_terminated();
            }
            TransportEvent::Message(payload) => self.on_message(&payload),
        }
    }

    fn on_opened(&mut self) {
        if self.state != ConnectionState::Connecting {
            debug!("Open notification ignored: connection is {}", self.state);
            return;
        }

        self.set_state(ConnectionState::Open);
        self.notify(Notification::Log("Connection open!".to_string()));

        // identity goes out before any other traffic on a fresh connection
        if let Err(e) = self.announce() {
            warn!("Failed to announce identity: {e}");
        }
    }

    fn on_terminated(&mut self) {
        self.subscription.clear();
        self.set_state(ConnectionState::Disconnected);
    }

    fn on_message(&mut self, payload: &[u8]) {
        if !matches!(self.state, ConnectionState::Open | ConnectionState::Closing) {
            debug!("Inbound message dropped: connection is {}", self.state);
            return;
        }

        let decoded = codec::decode(payload);
        if let Err(e) = &decoded {
            warn!(
                "Invalid server message: {e} | {}",
                String::from_utf8_lossy(payload).chars().take(100).collect::<String>()
            );
        }

        let outcome = dispatch(&self.subscription, decoded);

        if let Some(Mutation::StreamValue(value)) = outcome.mutation {
            self.subscription.record(value);
        }
        if let Some(notification) = outcome.notification {
            self.notify(notification);
        }
    }

    fn send(&mut self, command: Command) -> Result<(), SessionError> {
        if self.state != ConnectionState::Open {
            warn!("Cannot send '{}': connection is {}", command.tag(), self.state);
            self.notify(Notification::diagnostic(
                DiagnosticKind::NotConnected,
                format!("cannot send '{}' while {}", command.tag(), self.state),
            ));
            return Err(SessionError::NotConnected { state: self.state });
        }

        let payload = codec::encode(&command)?;
        if let Err(e) = self.transport.send_text(payload) {
            warn!("Failed to send '{}': {e}", command.tag());
            self.notify(Notification::diagnostic(
                DiagnosticKind::Transport,
                e.to_string(),
            ));
            return Err(e.into());
        }

        debug!("Sent '{}'", command.tag());
        Ok(())
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            debug!("Connection state {} -> {}", self.state, state);
            self.state = state;
            self.notify(Notification::StateChanged(state));
        }
    }

    fn notify(&self, notification: Notification) {
        if self.notifier.send(notification).is_err() {
            debug!("Notification dropped: no presentation layer listening");
        }
    }
}
