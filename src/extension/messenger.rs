//! Outbound event sending.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::warn;

use crate::debug::DebugLogger;
use crate::error::Result;
use crate::protocol::Envelope;
use crate::transport::ChannelHandle;

// ============================================================================
// Messenger
// ============================================================================

/// Sends named events to the shell's UI layer.
///
/// Cheap to clone; handlers capture a clone to reply. Available before the
/// handshake runs; the access token is bound once it resolves.
///
/// # Example
///
/// ```ignore
/// let messenger = extension.messenger();
/// let handlers = HandlerTable::new().handler("ping", move |parameter| {
///     messenger.send_message("pingResult", format!("PONG, in reply to {parameter}"))?;
///     Ok(())
/// });
/// ```
#[derive(Clone)]
pub struct Messenger {
    inner: Arc<MessengerInner>,
}

struct MessengerInner {
    access_token: OnceLock<String>,
    channel: ChannelHandle,
    debug: DebugLogger,
}

impl fmt::Debug for Messenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messenger")
            .field("channel", &self.inner.channel)
            .field("token_bound", &self.inner.access_token.get().is_some())
            .finish()
    }
}

impl Messenger {
    pub(crate) fn new(channel: ChannelHandle, debug: DebugLogger) -> Self {
        Self {
            inner: Arc::new(MessengerInner {
                access_token: OnceLock::new(),
                channel,
                debug,
            }),
        }
    }

    /// Binds the session access token. Later calls are ignored.
    pub(crate) fn bind_token(&self, access_token: &str) {
        if self.inner.access_token.set(access_token.to_owned()).is_err() {
            warn!("Access token already bound, keeping the first one");
        }
    }

    /// Returns `true` if the channel is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.channel.is_open()
    }

    /// Broadcasts `event` with `data` to the UI.
    ///
    /// Fire-and-forget: the shell sends no acknowledgement.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`](crate::Error::Json) if `data` cannot be serialized
    /// - [`Error::NotConnected`](crate::Error::NotConnected) if the channel
    ///   is not open; a warning is logged and the message is dropped
    pub fn send_message(&self, event: &str, data: impl Serialize) -> Result<()> {
        let access_token = self.inner.access_token.get().map(String::as_str).unwrap_or_default();
        let envelope = Envelope::broadcast(access_token, event, serde_json::to_value(data)?);
        let json = envelope.to_json()?;

        self.inner.channel.send_text(json.clone())?;
        self.inner.debug.log_outbound(&json);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
