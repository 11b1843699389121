//! Neutralino Bridge - sidecar extension runtime for desktop shells.
//!
//! This library lets a separate worker process act as a privileged
//! extension of a Neutralino-style desktop shell: the shell spawns the
//! process, hands it credentials, and the two talk over one WebSocket.
//!
//! # Architecture
//!
//! The bridge follows a client-server model:
//!
//! - **Shell (server)**: Spawns the extension, relays UI events to it,
//!   broadcasts its envelopes to the UI
//! - **Extension (Rust, client)**: Connects once, runs handlers on request,
//!   pushes named events back
//!
//! Key design principles:
//!
//! - One channel per process, no reconnection
//! - Inbound frames handled one at a time, in arrival order
//! - Asynchronous handlers are spawned, never awaited by the receive loop
//! - Handler failures are reported, never propagated
//!
//! # Quick Start
//!
//! ```no_run
//! use neutralino_bridge::{Extension, HandlerTable, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let extension = Extension::builder().debug(true).build();
//!     let messenger = extension.messenger();
//!
//!     let handlers = HandlerTable::new().handler("ping", move |parameter| {
//!         messenger.send_message("pingResult", format!("PONG, in reply to {parameter}"))?;
//!         Ok(())
//!     });
//!
//!     // Reads the handshake from argv or stdin, then runs until the shell closes
//!     extension.start(handlers).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`debug`] | Tagged, colorized traffic logging |
//! | [`dispatch`] | Handler table and remote-call dispatch |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`extension`] | [`Extension`] entry point and [`Messenger`] |
//! | [`handshake`] | Connection parameter resolution |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`lifecycle`] | Exit on window/application close |
//! | [`protocol`] | Envelope and frame types |
//! | [`transport`] | WebSocket channel |

// ============================================================================
// Modules
// ============================================================================

/// Tagged, colorized traffic logging.
pub mod debug;

/// Remote-call dispatch.
///
/// - [`HandlerTable`] - Handlers by name
/// - [`Dispatcher`] - Routes `runBun` frames to handlers
pub mod dispatch;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Extension entry point.
///
/// Use [`Extension::builder()`] to create a configured extension.
pub mod extension;

/// Handshake: endpoint and credential resolution.
pub mod handshake;

/// Type-safe identifiers.
pub mod identifiers;

/// Process lifecycle coupling.
pub mod lifecycle;

/// WebSocket protocol message types.
pub mod protocol;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Debug types
pub use debug::{DebugColors, DebugLogger, Direction};

// Dispatch types
pub use dispatch::{Dispatch, Dispatcher, Handler, HandlerResult, HandlerTable, Invocation};

// Error types
pub use error::{BoxError, Error, Result};

// Extension types
pub use extension::{Extension, ExtensionBuilder, ExtensionOptions, Messenger};

// Handshake types
pub use handshake::{ConnectionParameters, StdinConfig};

// Identifier types
pub use identifiers::MessageId;

// Lifecycle types
pub use lifecycle::{Flow, LifecycleController};

// Protocol types
pub use protocol::{Envelope, Frame, InboundEvent, LifecycleSignal, RemoteCall};

// Transport types
pub use transport::{Channel, ChannelHandle, ChannelState, Termination};
