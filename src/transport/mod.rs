//! WebSocket transport layer.
//!
//! This module owns the one connection between the extension (this
//! process, the client) and the shell (the server).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                              ┌─────────────────┐
//! │  Extension       │         WebSocket            │  Shell          │
//! │                  │                              │                 │
//! │  Channel         │─────────────────────────────►│  WebSocket      │
//! │  ChannelHandle   │  127.0.0.1:PORT?extensionId  │  server         │
//! └──────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Channel::new` - Unconnected channel, handles can be cloned out
//! 2. `Channel::open` - Single connection attempt
//! 3. `Channel::run` - Event loop until close, error, or lifecycle signal
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Channel state machine and event loop |

// ============================================================================
// Submodules
// ============================================================================

/// Channel state machine and event loop.
pub mod channel;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{Channel, ChannelHandle, ChannelState, Termination};
