//! WebSocket protocol message types.
//!
//! This module defines the message format spoken between the extension
//! (this process) and the shell.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Envelope` | Extension → Shell | Broadcast an event to the UI |
//! | `Frame` | Shell → Extension | Remote call, lifecycle signal, or event |
//!
//! Both directions are fire-and-forget: nothing is correlated by id.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | Outbound broadcast envelope |
//! | `frame` | Inbound frame decoding and classification |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound broadcast envelope.
pub mod envelope;

/// Inbound frame types.
pub mod frame;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{BROADCAST_METHOD, BroadcastEvent, Envelope};
pub use frame::{
    APP_CLOSE_EVENT, Frame, InboundEvent, LifecycleSignal, REMOTE_CALL_EVENT, RemoteCall,
    WINDOW_CLOSE_EVENT,
};
