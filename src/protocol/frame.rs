//! Inbound frame decoding and classification.
//!
//! Every inbound WebSocket message becomes exactly one [`Frame`]. Text that
//! is not JSON is kept verbatim as [`Frame::Opaque`] and never matches a
//! sentinel.
//!
//! # Sentinels
//!
//! | Event | Variant |
//! |-------|---------|
//! | `runBun` with `data.function` | [`Frame::RemoteCall`] |
//! | `windowClose` | [`Frame::Lifecycle`] ([`LifecycleSignal::WindowClose`]) |
//! | `appClose` | [`Frame::Lifecycle`] ([`LifecycleSignal::AppClose`]) |
//! | anything else | [`Frame::Event`] |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde_json::{Map, Value};

// ============================================================================
// Constants
// ============================================================================

/// Event name marking a remote-call request from the UI.
pub const REMOTE_CALL_EVENT: &str = "runBun";

/// Event name sent when the shell window closes.
pub const WINDOW_CLOSE_EVENT: &str = "windowClose";

/// Event name sent when the application is shutting down.
pub const APP_CLOSE_EVENT: &str = "appClose";

// ============================================================================
// LifecycleSignal
// ============================================================================

/// Shell event asking the extension process to go away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleSignal {
    /// The main window was closed.
    WindowClose,
    /// The application is closing.
    AppClose,
}

impl LifecycleSignal {
    /// Maps an event name to a signal.
    #[must_use]
    pub fn from_event(event: &str) -> Option<Self> {
        match event {
            WINDOW_CLOSE_EVENT => Some(Self::WindowClose),
            APP_CLOSE_EVENT => Some(Self::AppClose),
            _ => None,
        }
    }

    /// Returns the wire event name.
    #[inline]
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::WindowClose => WINDOW_CLOSE_EVENT,
            Self::AppClose => APP_CLOSE_EVENT,
        }
    }
}

impl fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

// ============================================================================
// RemoteCall
// ============================================================================

/// Request to invoke a locally registered handler.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    /// Handler name (never empty).
    pub function: String,
    /// Parameter passed to the handler (`null` when absent).
    pub parameter: Value,
}

// ============================================================================
// InboundEvent
// ============================================================================

/// Structured frame that is neither a remote call nor a lifecycle signal.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Event name, when the frame is an object with a string `event`.
    pub event: Option<String>,
    /// The frame's `data` field, or the whole value for non-object JSON.
    pub data: Value,
}

// ============================================================================
// Frame
// ============================================================================

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// `runBun` event naming a handler.
    RemoteCall(RemoteCall),
    /// Window/application close event.
    Lifecycle(LifecycleSignal),
    /// Any other structured message.
    Event(InboundEvent),
    /// Text that failed JSON decoding, unmodified.
    Opaque(String),
}

impl Frame {
    /// Decodes a text frame.
    ///
    /// Never fails: undecodable text becomes [`Frame::Opaque`].
    #[must_use]
    pub fn decode(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::classify(value),
            Err(_) => Self::Opaque(text.to_owned()),
        }
    }

    /// Decodes a binary frame as UTF-8 (invalid sequences are replaced).
    #[must_use]
    pub fn decode_bytes(bytes: &[u8]) -> Self {
        Self::decode(&String::from_utf8_lossy(bytes))
    }

    /// Classifies an already-parsed JSON value.
    #[must_use]
    pub fn classify(value: Value) -> Self {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Self::Event(InboundEvent {
                    event: None,
                    data: other,
                });
            }
        };

        let event = match object.remove("event") {
            Some(Value::String(event)) => Some(event),
            _ => None,
        };
        let data = object.remove("data").unwrap_or(Value::Null);

        if let Some(signal) = event.as_deref().and_then(LifecycleSignal::from_event) {
            return Self::Lifecycle(signal);
        }

        if event.as_deref() == Some(REMOTE_CALL_EVENT)
            && let Value::Object(call) = &data
            && let Some(remote_call) = Self::remote_call(call)
        {
            return Self::RemoteCall(remote_call);
        }

        Self::Event(InboundEvent { event, data })
    }

    fn remote_call(call: &Map<String, Value>) -> Option<RemoteCall> {
        let function = match call.get("function") {
            Some(Value::String(function)) if !function.is_empty() => function.clone(),
            _ => return None,
        };
        let parameter = call.get("parameter").cloned().unwrap_or(Value::Null);

        Some(RemoteCall {
            function,
            parameter,
        })
    }

    /// Returns the frame's event name, if it has one.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        match self {
            Self::RemoteCall(_) => Some(REMOTE_CALL_EVENT),
            Self::Lifecycle(signal) => Some(signal.event_name()),
            Self::Event(event) => event.event.as_deref(),
            Self::Opaque(_) => None,
        }
    }

    /// Returns `true` if the frame carries the remote-call event name,
    /// whether or not it names a handler.
    #[inline]
    #[must_use]
    pub fn is_remote_call_event(&self) -> bool {
        self.event_name() == Some(REMOTE_CALL_EVENT)
    }

    /// Returns `true` if JSON decoding failed for this frame.
    #[inline]
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
