//! Builder pattern for extension configuration.
//!
//! Provides a fluent API for configuring and creating [`Extension`] instances.
//!
//! # Example
//!
//! ```no_run
//! use neutralino_bridge::Extension;
//!
//! let extension = Extension::builder()
//!     .debug(true)
//!     .terminate_on_window_close(true)
//!     .build();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io::{self, Write};

use crate::debug::{DebugColors, DebugLogger};

use super::core::Extension;
use super::options::ExtensionOptions;

// ============================================================================
// ExtensionBuilder
// ============================================================================

/// Builder for configuring an [`Extension`].
///
/// Use [`Extension::builder()`] to create a new builder.
#[derive(Default)]
pub struct ExtensionBuilder {
    /// Runtime options.
    options: ExtensionOptions,
    /// Destination for traffic lines (stdout when unset).
    debug_writer: Option<Box<dyn Write + Send>>,
}

impl fmt::Debug for ExtensionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionBuilder")
            .field("options", &self.options)
            .field("custom_writer", &self.debug_writer.is_some())
            .finish()
    }
}

// ============================================================================
// ExtensionBuilder Implementation
// ============================================================================

impl ExtensionBuilder {
    /// Creates a builder with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables traffic logging.
    #[inline]
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.options.debug = enabled;
        self
    }

    /// Enables or disables exiting on `windowClose`/`appClose`.
    #[inline]
    #[must_use]
    pub fn terminate_on_window_close(mut self, enabled: bool) -> Self {
        self.options.terminate_on_window_close = enabled;
        self
    }

    /// Sets traffic line colors.
    #[inline]
    #[must_use]
    pub fn colors(mut self, colors: DebugColors) -> Self {
        self.options.colors = colors;
        self
    }

    /// Replaces all options at once.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ExtensionOptions) -> Self {
        self.options = options;
        self
    }

    /// Sends traffic lines to `writer` instead of stdout.
    #[inline]
    #[must_use]
    pub fn debug_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.debug_writer = Some(Box::new(writer));
        self
    }

    /// Builds the extension.
    #[must_use]
    pub fn build(self) -> Extension {
        let options = self.options;
        let writer = self
            .debug_writer
            .unwrap_or_else(|| Box::new(io::stdout()));
        let logger = DebugLogger::with_writer(options.debug, options.colors, writer);

        Extension::new(options, logger)
    }
}

// ============================================================================
// Tests
// ============================================================================
