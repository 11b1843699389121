//! Handshake: resolving the channel endpoint and credentials.
//!
//! The shell hands the extension its connection parameters in one of two
//! ways, chosen by whether launch arguments are present:
//!
//! ```text
//! argv: <prog> port=<p> token=<t> extensionId=<id>
//!       → ws://127.0.0.1:<p>?extensionId=<id>
//!
//! stdin: {"nlPort":"..","nlToken":"..","nlConnectToken":"..","nlExtensionId":".."}
//!       → ws://127.0.0.1:<p>?extensionId=<id>&connectToken=<ct>
//! ```
//!
//! Any missing or malformed value is an [`Error::Config`](crate::Error::Config)
//! and aborts startup before a channel exists.

// ============================================================================
// Submodules
// ============================================================================

/// Resolved connection parameters.
pub mod params;

/// Argument and stdin resolution.
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use params::{ConnectionParameters, DEFAULT_HOST};
pub use resolver::{StdinConfig, resolve, resolve_from_process};
