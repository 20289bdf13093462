//! WebSocket transport
//!
//! Each `connect` spawns one connection task that owns the socket. The task:
//! - performs the client handshake and reports `Opened` or `Error`
//! - forwards queued outbound frames from an unbounded channel to the socket
//! - reports every inbound data frame as `Message`, in arrival order
//! - finishes with exactly one terminal event (`Closed` or `Error`), after
//!   marking itself finished so the transport can be reconnected right away

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::transport::{Transport, TransportEvent};
use crate::utils::TransportError;

/// [`Transport`] backed by `tokio-tungstenite`.
///
/// Must be driven from inside a Tokio runtime.
#[derive(Debug, Default)]
pub struct WebSocketTransport {
    outbound: Option<UnboundedSender<WsMessage>>,
    /// Cleared by the connection task before its terminal event.
    live: Option<Arc<AtomicBool>>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_running(&self) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| live.load(Ordering::Acquire))
    }
}

impl Transport for WebSocketTransport {
    fn connect(
        &mut self,
        url: &str,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<(), TransportError> {
        if self.is_running() {
            return Err(TransportError::AlreadyActive);
        }

        let runtime = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
        let live = Arc::new(AtomicBool::new(true));

        self.outbound = Some(tx);
        self.live = Some(live.clone());
        runtime.spawn(run_connection(url.to_string(), rx, events, live));

        Ok(())
    }

    fn send_text(&mut self, payload: String) -> Result<(), TransportError> {
        let sender = self.outbound.as_ref().ok_or(TransportError::NotOpen)?;
        sender
            .send(WsMessage::text(payload))
            .map_err(|_| TransportError::ChannelClosed)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let sender = self.outbound.take().ok_or(TransportError::NotOpen)?;
        sender
            .send(WsMessage::Close(None))
            .map_err(|_| TransportError::ChannelClosed)
    }
}

async fn run_connection(
    url: String,
    mut outbound: UnboundedReceiver<WsMessage>,
    events: UnboundedSender<TransportEvent>,
    live: Arc<AtomicBool>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {url} failed: {e}");
            finish(&live, &events, TransportEvent::Error(e.to_string()));
            return;
        }
    };

    info!("Connected to {url}");
    let _ = events.send(TransportEvent::Opened);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut outbound_done = false;
    let mut closing = false;
    let mut close_code = None;

    loop {
        tokio::select! {
            outgoing = outbound.recv(), if !outbound_done => match outgoing {
                Some(msg) => {
                    closing |= msg.is_close();
                    if let Err(e) = ws_sender.send(msg).await {
                        if closing {
                            break;
                        }
                        warn!("Failed to send frame to {url}: {e}");
                        finish(&live, &events, TransportEvent::Error(e.to_string()));
                        return;
                    }
                }
                None => {
                    // transport handle dropped without an explicit close
                    outbound_done = true;
                    closing = true;
                    let _ = ws_sender.close().await;
                }
            },

            incoming = ws_receiver.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    let _ = events.send(TransportEvent::Message(text.as_str().as_bytes().to_vec()));
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    let _ = events.send(TransportEvent::Message(data.to_vec()));
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("Close frame from {url}: {frame:?}");
                    close_code = frame.map(|f| u16::from(f.code));
                    closing = true;
                }
                Some(Ok(_)) => {}
                Some(Err(
                    tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed,
                ))
                | None => break,
                Some(Err(e)) => {
                    if closing {
                        break;
                    }
                    warn!("Connection to {url} broke: {e}");
                    finish(&live, &events, TransportEvent::Error(e.to_string()));
                    return;
                }
            },
        }
    }

    info!("Connection to {url} closed");
    finish(&live, &events, TransportEvent::Closed(close_code));
}

/// Marks the connection finished, then reports its terminal event. The order
/// matters: whoever handles the event may reconnect immediately.
fn finish(live: &AtomicBool, events: &UnboundedSender<TransportEvent>, event: TransportEvent) {
    live.store(false, Ordering::Release);
    let _ = events.send(event);
}
