//! Error types for the extension bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use neutralino_bridge::{ConnectionParameters, Result};
//!
//! fn example(args: &[String]) -> Result<()> {
//!     let params = ConnectionParameters::from_args(args)?;
//!     println!("{:?}", params);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants | Fatal |
//! |----------|----------|-------|
//! | Configuration | [`Error::Config`] | yes, aborts startup |
//! | Connection | [`Error::Connection`], [`Error::NotConnected`], [`Error::ConnectionClosed`] | no |
//! | Handler | [`Error::Handler`] | no, reported only |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] | depends on caller |

// ============================================================================
// Imports
// ============================================================================

use std::error::Error as StdError;
use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

/// Boxed error returned by handler bodies.
///
/// Lets embedding code use `?` with any error type inside a handler.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Handshake or configuration error.
    ///
    /// Returned when launch arguments or the stdin configuration are
    /// missing or malformed. Always fatal to startup.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// A send was attempted while the channel was not open.
    ///
    /// The message is dropped, never queued.
    #[error("Socket is not connected")]
    NotConnected,

    /// The channel closed and can no longer carry messages.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Handler Errors
    // ========================================================================
    /// A registered handler failed.
    ///
    /// Only ever reported through logging; never propagated to the
    /// receive loop.
    #[error("Error in handler \"{name}\": {message}")]
    Handler {
        /// Name the handler was registered under.
        name: String,
        /// Failure description.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a handler error.
    #[inline]
    pub fn handler(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            name: name.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error must abort startup.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::NotConnected | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
