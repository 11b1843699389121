//! Extension runtime options.
//!
//! # Example
//!
//! ```ignore
//! use neutralino_bridge::ExtensionOptions;
//!
//! let options = ExtensionOptions::new()
//!     .with_debug()
//!     .with_plain_output()
//!     .without_terminate_on_window_close();
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::debug::DebugColors;

// ============================================================================
// ExtensionOptions
// ============================================================================

/// Runtime options for an [`Extension`](super::Extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionOptions {
    /// Write tagged traffic lines for every inbound and outbound message.
    pub debug: bool,

    /// Exit the process when the shell sends `windowClose` or `appClose`.
    pub terminate_on_window_close: bool,

    /// Terminal colors for traffic lines.
    pub colors: DebugColors,
}

impl Default for ExtensionOptions {
    fn default() -> Self {
        Self {
            debug: false,
            terminate_on_window_close: true,
            colors: DebugColors::default(),
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ExtensionOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with traffic logging enabled.
    #[inline]
    #[must_use]
    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Default::default()
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ExtensionOptions {
    /// Enables traffic logging.
    #[inline]
    #[must_use]
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Keeps the process alive on window/application close signals.
    #[inline]
    #[must_use]
    pub fn without_terminate_on_window_close(mut self) -> Self {
        self.terminate_on_window_close = false;
        self
    }

    /// Sets traffic line colors.
    #[inline]
    #[must_use]
    pub fn with_colors(mut self, colors: DebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Disables ANSI colors in traffic lines.
    #[inline]
    #[must_use]
    pub fn with_plain_output(mut self) -> Self {
        self.colors.enabled = false;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
