//! The single duplex channel to the shell.
//!
//! # State Machine
//!
//! ```text
//! Unconnected ──open()──► Connecting ──ok──► Open ──close──► Closed
//!                              │               └───error──► Errored
//!                              └──fail──► Errored
//! ```
//!
//! `Closed` and `Errored` are terminal: there is no reconnection.
//!
//! # Event Loop
//!
//! [`Channel::run`] multiplexes two sources:
//!
//! - Inbound WebSocket messages, decoded to [`Frame`]s and handed to the
//!   frame callback one at a time, in arrival order
//! - Outbound text queued through a [`ChannelHandle`], written in
//!   submission order

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};

use crate::error::{Error, Result};
use crate::handshake::ConnectionParameters;
use crate::lifecycle::Flow;
use crate::protocol::{Frame, LifecycleSignal};

// ============================================================================
// Types
// ============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// ChannelState
// ============================================================================

/// Lifecycle state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// Not yet opened.
    Unconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Ready to send and receive.
    Open,
    /// Closed by either side.
    Closed,
    /// Failed to open or failed while open.
    Errored,
}

impl ChannelState {
    /// Returns `true` for `Closed` and `Errored`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

// ============================================================================
// Termination
// ============================================================================

/// Why [`Channel::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The shell announced it is closing.
    Lifecycle(LifecycleSignal),
    /// The socket was closed.
    Closed {
        /// Close code, if the peer sent one.
        code: Option<u16>,
        /// Close reason.
        reason: String,
    },
    /// A transport error ended the channel.
    Errored(String),
    /// The channel never reached `Open`.
    NeverOpened,
}

// ============================================================================
// ChannelHandle
// ============================================================================

/// Cloneable sending side of the channel.
///
/// # Thread Safety
///
/// `ChannelHandle` is `Send + Sync`; handlers running in their own tasks
/// may send concurrently. Sends never block.
#[derive(Clone)]
pub struct ChannelHandle {
    state: Arc<Mutex<ChannelState>>,
    outbound_tx: mpsc::UnboundedSender<Message>,
}

impl fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ChannelHandle {
    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChannelState {
        *self.state.lock()
    }

    /// Returns `true` if the channel is open.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    /// Queues a text message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] (after logging a warning) if the
    /// channel is not open. The message is dropped.
    pub fn send_text(&self, text: String) -> Result<()> {
        if !self.is_open() {
            warn!(state = ?self.state(), "WebSocket send: socket is not connected");
            return Err(Error::NotConnected);
        }

        self.outbound_tx
            .send(Message::Text(text.into()))
            .map_err(|_| Error::ConnectionClosed)
    }

    fn set_state(&self, state: ChannelState) {
        let mut guard = self.state.lock();
        let previous = *guard;
        trace!(from = ?previous, to = ?state, "Channel state change");
        *guard = state;
    }
}

// ============================================================================
// Channel
// ============================================================================

/// Owner of the WebSocket connection to the shell.
///
/// Exactly one channel exists per process.
pub struct Channel {
    handle: ChannelHandle,
    outbound_rx: mpsc::UnboundedReceiver<Message>,
    stream: Option<WsStream>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel {
    /// Creates an unconnected channel.
    #[must_use]
    pub fn new() -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        Self {
            handle: ChannelHandle {
                state: Arc::new(Mutex::new(ChannelState::Unconnected)),
                outbound_tx,
            },
            outbound_rx,
            stream: None,
        }
    }

    /// Returns a sending handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> ChannelHandle {
        self.handle.clone()
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.handle.state()
    }

    /// Makes the single connection attempt.
    ///
    /// Failure is logged and leaves the channel `Errored`; it is never
    /// returned to the caller.
    pub async fn open(&mut self, params: &ConnectionParameters) {
        if self.state() != ChannelState::Unconnected {
            warn!(state = ?self.state(), "Channel already opened once, ignoring");
            return;
        }

        self.handle.set_state(ChannelState::Connecting);
        let url = params.ws_url();
        debug!(%url, "Connecting to shell");

        match connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                self.stream = Some(stream);
                self.handle.set_state(ChannelState::Open);
                info!(port = params.port(), "WebSocket ready");
            }
            Err(e) => {
                self.handle.set_state(ChannelState::Errored);
                error!(error = %Error::from(e), %url, "WebSocket error");
            }
        }
    }

    /// Runs the event loop until the channel ends or `on_frame` returns
    /// [`Flow::Terminate`].
    ///
    /// `on_frame` receives the raw text and the decoded frame, and runs to
    /// completion before the next message is read.
    pub async fn run<F>(mut self, mut on_frame: F) -> Termination
    where
        F: FnMut(&str, Frame) -> Flow,
    {
        let Some(stream) = self.stream.take() else {
            debug!(state = ?self.state(), "Channel never opened, nothing to run");
            return Termination::NeverOpened;
        };

        let (mut ws_write, mut ws_read) = stream.split();

        let termination = loop {
            tokio::select! {
                // Incoming messages from the shell
                message = ws_read.next() => {
                    let frame = match message {
                        Some(Ok(Message::Text(text))) => Some((text.as_str().to_owned(), Frame::decode(&text))),

                        Some(Ok(Message::Binary(bytes))) => {
                            let text = String::from_utf8_lossy(&bytes).into_owned();
                            let frame = Frame::decode(&text);
                            Some((text, frame))
                        }

                        Some(Ok(Message::Close(close))) => {
                            break Self::closed(close);
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break Termination::Errored(e.to_string());
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break Self::closed(None);
                        }

                        // Ping/Pong are answered by tungstenite
                        _ => None,
                    };

                    if let Some((text, frame)) = frame
                        && let Flow::Terminate(signal) = on_frame(&text, frame)
                    {
                        if let Err(e) = ws_write.close().await {
                            debug!(error = %e, "WebSocket close failed");
                        }
                        break Termination::Lifecycle(signal);
                    }
                }

                // Outbound messages from senders
                Some(message) = self.outbound_rx.recv() => {
                    if let Err(e) = ws_write.send(message).await {
                        error!(error = %e, "WebSocket error");
                        break Termination::Errored(e.to_string());
                    }
                    trace!("Message sent");
                }
            }
        };

        let state = match termination {
            Termination::Errored(_) => ChannelState::Errored,
            _ => ChannelState::Closed,
        };
        self.handle.set_state(state);

        debug!(?termination, "Event loop terminated");
        termination
    }

    fn closed(close: Option<CloseFrame>) -> Termination {
        let (code, reason) = match close {
            Some(frame) => (Some(u16::from(frame.code)), frame.reason.as_str().to_owned()),
            None => (None, String::new()),
        };

        let shown_reason = if reason.is_empty() {
            "No reason provided"
        } else {
            reason.as_str()
        };
        info!(
            code = code.unwrap_or_default(),
            reason = shown_reason,
            "WebSocket closed"
        );

        Termination::Closed { code, reason }
    }
}

// ============================================================================
// Tests
// ============================================================================
