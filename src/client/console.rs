//! Line-oriented console front end.
//!
//! Stands in for a rendering host: it reads commands from stdin, prints every
//! notification, and owns the session so that user input, transport events
//! and timers are all handled on one task.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::client::ClientIdentity;
use crate::config::Settings;
use crate::session::{ConnectionState, Notification, Session};
use crate::transport::{Transport, TransportEvent, WebSocketTransport};
use crate::utils::SessionError;

/// How long to wait for the closing handshake on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const USAGE: &str = "commands: /stream <name>, /refresh, /broadcast <text>, /start <name>, \
/publish <name> <value>, /close <name>, /whisper <client> <text>, /announce, /connect, \
/disconnect, /quit; anything else is sent as a message";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Empty,
    Message(String),
    Stream(String),
    Refresh,
    Broadcast(String),
    StartStream(String),
    Publish { stream_name: String, value: String },
    CloseStream(String),
    Whisper { target_id: String, text: String },
    Announce,
    Connect,
    Disconnect,
    Quit,
    Invalid(String),
}

pub fn parse_input(line: &str) -> ConsoleInput {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return ConsoleInput::Empty;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return ConsoleInput::Message(line.to_string());
    };

    let (command, arg) = match rest.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (rest, ""),
    };

    match (command, arg) {
        ("stream", name) if !name.is_empty() => ConsoleInput::Stream(name.to_string()),
        ("refresh", "") => ConsoleInput::Refresh,
        ("broadcast", text) if !text.is_empty() => ConsoleInput::Broadcast(text.to_string()),
        ("start", name) if !name.is_empty() => ConsoleInput::StartStream(name.to_string()),
        ("close", name) if !name.is_empty() => ConsoleInput::CloseStream(name.to_string()),
        ("publish", args) => match args.split_once(char::is_whitespace) {
            Some((name, value)) if !value.trim().is_empty() => ConsoleInput::Publish {
                stream_name: name.to_string(),
                value: value.trim().to_string(),
            },
            _ => ConsoleInput::Invalid(line.to_string()),
        },
        ("whisper", args) => match args.split_once(char::is_whitespace) {
            Some((target, text)) if !text.trim().is_empty() => ConsoleInput::Whisper {
                target_id: target.to_string(),
                text: text.trim().to_string(),
            },
            _ => ConsoleInput::Invalid(line.to_string()),
        },
        ("announce", "") => ConsoleInput::Announce,
        ("connect", "") => ConsoleInput::Connect,
        ("disconnect", "") => ConsoleInput::Disconnect,
        ("quit" | "exit", "") => ConsoleInput::Quit,
        _ => ConsoleInput::Invalid(line.to_string()),
    }
}

/// Formats a notification as one line of console output.
pub fn render(notification: &Notification) -> String {
    match notification {
        Notification::Log(text) => text.clone(),
        Notification::StreamValueUpdated { stream_name, value } => {
            format!("[{stream_name}] {value}")
        }
        Notification::Diagnostic { kind, detail } => format!("! {kind}: {detail}"),
        Notification::IdentityRequested => "Server requested client id".to_string(),
        Notification::StateChanged(state) => format!("-- {state}"),
    }
}

/// Runs the console client until `/quit`, Ctrl-C, or, once stdin is
/// exhausted, until the connection ends.
pub async fn run(settings: Settings) {
    let identity = settings
        .client
        .client_id
        .clone()
        .map(ClientIdentity::new)
        .unwrap_or_else(ClientIdentity::generate);
    let url = settings.client.url.clone();
    let initial_stream = settings.client.stream.clone();

    let (mut session, mut channels) = Session::new(identity, WebSocketTransport::new());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut poll = poll_interval(settings.client.poll_interval_ms);

    println!("Client {} ready. {USAGE}", session.identity());
    report(session.connect(&url));

    loop {
        tokio::select! {
            Some(event) = channels.events.recv() => {
                on_event(&mut session, event, initial_stream.as_deref());
            }

            Some(notification) = channels.notifications.recv() => {
                println!("{}", render(&notification));
                on_notification(&mut session, &notification);
                if notification == Notification::StateChanged(ConnectionState::Disconnected)
                    && !stdin_open
                {
                    break;
                }
            }

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if !apply_input(&mut session, &url, parse_input(&line)) {
                        break;
                    }
                }
                Ok(None) | Err(_) => {
                    debug!("stdin closed");
                    stdin_open = false;
                    if session.state() == ConnectionState::Disconnected {
                        break;
                    }
                }
            },

            _ = next_tick(&mut poll) => {
                if session.state() == ConnectionState::Open {
                    report(session.refresh_stream());
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting gracefully.");
                break;
            }
        }
    }

    session.disconnect();
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while session.state() != ConnectionState::Disconnected {
            match channels.events.recv().await {
                Some(event) => session.handle_transport_event(event),
                None => break,
            }
        }
    })
    .await;
}

/// Applies one transport event. Once the connection opens, the configured
/// stream, if any, is requested.
pub(crate) fn on_event<T: Transport>(
    session: &mut Session<T>,
    event: TransportEvent,
    initial_stream: Option<&str>,
) {
    let opened = event == TransportEvent::Opened;
    session.handle_transport_event(event);
    if opened && session.state() == ConnectionState::Open {
        if let Some(stream) = initial_stream {
            report(session.request_stream(stream));
        }
    }
}

/// Acts on notifications that call for a reply to the server.
pub(crate) fn on_notification<T: Transport>(
    session: &mut Session<T>,
    notification: &Notification,
) {
    if *notification == Notification::IdentityRequested {
        report(session.announce());
    }
}

/// Applies one input line. Returns `false` when the user asked to quit.
pub(crate) fn apply_input<T: Transport>(
    session: &mut Session<T>,
    url: &str,
    input: ConsoleInput,
) -> bool {
    match input {
        ConsoleInput::Empty => {}
        ConsoleInput::Message(text) => report(session.send_user_message(&text)),
        ConsoleInput::Stream(name) => report(session.request_stream(&name)),
        ConsoleInput::Refresh => report(session.refresh_stream()),
        ConsoleInput::Broadcast(text) => report(session.broadcast(&text)),
        ConsoleInput::StartStream(name) => report(session.start_stream(&name)),
        ConsoleInput::Publish { stream_name, value } => {
            report(session.publish_stream_data(&stream_name, &value))
        }
        ConsoleInput::CloseStream(name) => report(session.close_stream(&name)),
        ConsoleInput::Whisper { target_id, text } => {
            report(session.send_to_client(&target_id, &text))
        }
        ConsoleInput::Announce => report(session.announce()),
        ConsoleInput::Connect => report(session.connect(url)),
        ConsoleInput::Disconnect => session.disconnect(),
        ConsoleInput::Quit => return false,
        ConsoleInput::Invalid(line) => println!("? {line}\n{USAGE}"),
    }
    true
}

/// Session failures are already surfaced as notifications.
fn report(result: Result<(), SessionError>) {
    if let Err(e) = result {
        debug!("{e}");
    }
}

fn poll_interval(millis: u64) -> Option<Interval> {
    (millis > 0).then(|| {
        let mut interval = tokio::time::interval(Duration::from_millis(millis));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    })
}

async fn next_tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
