//! Outbound broadcast envelope.
//!
//! Every message the extension pushes to the shell is wrapped in a
//! broadcast call so the shell relays it to its UI layer.
//!
//! # Format
//!
//! ```json
//! {
//!   "id": "uuid",
//!   "method": "app.broadcast",
//!   "accessToken": "token",
//!   "data": { "event": "pingResult", "data": "..." }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::identifiers::MessageId;

// ============================================================================
// Constants
// ============================================================================

/// Shell method that relays an event to every UI listener.
pub const BROADCAST_METHOD: &str = "app.broadcast";

// ============================================================================
// Envelope
// ============================================================================

/// Outbound message sent from the extension to the shell.
///
/// Fire-and-forget: `id` is fresh per envelope and no response is awaited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Unique identifier for this send.
    pub id: MessageId,

    /// Shell method, always [`BROADCAST_METHOD`].
    pub method: String,

    /// Session access token, attached verbatim.
    pub access_token: String,

    /// The broadcast event.
    pub data: BroadcastEvent,
}

/// Named event carried inside an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    /// Event name the UI listens for.
    pub event: String,

    /// Arbitrary payload (`null` when absent).
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Wraps an event and payload in a broadcast envelope.
    ///
    /// A new [`MessageId`] is generated on every call.
    #[must_use]
    pub fn broadcast(access_token: impl Into<String>, event: impl Into<String>, data: Value) -> Self {
        Self {
            id: MessageId::generate(),
            method: BROADCAST_METHOD.to_string(),
            access_token: access_token.into(),
            data: BroadcastEvent {
                event: event.into(),
                data,
            },
        }
    }

    /// Serializes the envelope to its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the payload cannot be serialized.
    #[inline]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
