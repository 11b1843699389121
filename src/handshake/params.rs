//! Resolved connection parameters.

// ============================================================================
// Imports
// ============================================================================

use urlencoding::encode;

// ============================================================================
// Constants
// ============================================================================

/// The shell only ever listens on loopback.
pub const DEFAULT_HOST: &str = "127.0.0.1";

// ============================================================================
// ConnectionParameters
// ============================================================================

/// Endpoint and credentials for the single channel to the shell.
///
/// Built once per process and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    host: String,
    port: u16,
    access_token: String,
    connect_token: Option<String>,
    extension_id: String,
}

impl ConnectionParameters {
    /// Creates parameters for the loopback host.
    #[must_use]
    pub fn new(
        port: u16,
        access_token: impl Into<String>,
        connect_token: Option<String>,
        extension_id: impl Into<String>,
    ) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            access_token: access_token.into(),
            connect_token: connect_token.filter(|token| !token.is_empty()),
            extension_id: extension_id.into(),
        }
    }

    /// Returns the host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the access token attached to every outbound envelope.
    #[inline]
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the connect token (stdin handshake only).
    #[inline]
    #[must_use]
    pub fn connect_token(&self) -> Option<&str> {
        self.connect_token.as_deref()
    }

    /// Returns the extension id.
    #[inline]
    #[must_use]
    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    /// Returns the WebSocket URL for the shell.
    ///
    /// Format: `ws://127.0.0.1:{port}/?extensionId={id}[&connectToken={token}]`
    ///
    /// The request target is always rooted at `/`; an HTTP request line
    /// without a path is rejected by conforming servers.
    #[must_use]
    pub fn ws_url(&self) -> String {
        let mut url = format!(
            "ws://{}:{}/?extensionId={}",
            self.host,
            self.port,
            encode(&self.extension_id)
        );

        if let Some(connect_token) = &self.connect_token {
            url.push_str("&connectToken=");
            url.push_str(&encode(connect_token));
        }

        url
    }
}

// ============================================================================
// Tests
// ============================================================================
