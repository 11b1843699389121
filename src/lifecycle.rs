//! Process lifecycle coupling.
//!
//! Observes every inbound frame and asks for process termination when the
//! shell announces that the window or application is closing. Runs before
//! logging and dispatch; a terminating frame is not handled further.

// ============================================================================
// Imports
// ============================================================================

use tracing::info;

use crate::protocol::{Frame, LifecycleSignal};

// ============================================================================
// Flow
// ============================================================================

/// Decision for the receive loop after observing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep handling this frame and later ones.
    Continue,
    /// Stop the loop; the process should exit successfully.
    Terminate(LifecycleSignal),
}

// ============================================================================
// LifecycleController
// ============================================================================

/// Side observer terminating the process on close signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleController {
    enabled: bool,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LifecycleController {
    /// Creates a controller; `enabled = false` ignores close signals.
    #[inline]
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns `true` if close signals terminate the process.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Inspects a frame.
    #[must_use]
    pub fn observe(&self, frame: &Frame) -> Flow {
        match frame {
            Frame::Lifecycle(signal) if self.enabled => Flow::Terminate(*signal),
            _ => Flow::Continue,
        }
    }

    /// Exits the process with a success status.
    ///
    /// In-flight handler tasks are abandoned.
    pub fn exit(signal: LifecycleSignal) -> ! {
        info!(%signal, "Shell is closing, terminating extension");
        std::process::exit(0)
    }
}

// ============================================================================
// Tests
// ============================================================================
