//! Traffic debug logger.
//!
//! When enabled, every inbound frame and outbound envelope is written as a
//! tagged, optionally colorized line and also emitted as a `tracing` event:
//!
//! ```text
//! IN:  {"event":"serverOffline"}                       (green)
//! CALL: {"event":"runBun","data":{"function":"ping"}}  (bright red)
//! OUT: {"id":"..","method":"app.broadcast",..}         (yellow)
//! ```
//!
//! Colors go through [`colored`], so its global switches (`NO_COLOR`,
//! `CLICOLOR`, [`colored::control::set_override`]) apply on top of
//! [`DebugColors::enabled`].
//!
//! Write failures are ignored; logging never fails the caller.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use colored::{Color, Colorize};
use parking_lot::Mutex;
use tracing::debug;

use crate::protocol::Frame;

// ============================================================================
// Types
// ============================================================================

/// Destination for debug lines.
type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

// ============================================================================
// Direction
// ============================================================================

/// Tag attached to each debug line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ordinary inbound event.
    In,
    /// Inbound remote-call request.
    Call,
    /// Outbound envelope.
    Out,
}

impl Direction {
    /// Returns the line prefix.
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::In => "IN:  ",
            Self::Call => "CALL: ",
            Self::Out => "OUT: ",
        }
    }

    /// Returns the structured tag.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Call => "call",
            Self::Out => "out",
        }
    }
}

// ============================================================================
// DebugColors
// ============================================================================

/// Terminal colors for debug lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugColors {
    /// Emit ANSI color codes at all.
    pub enabled: bool,
    /// Color for ordinary inbound events.
    pub inbound: Color,
    /// Color for inbound remote calls.
    pub call: Color,
    /// Color for outbound envelopes.
    pub outbound: Color,
}

impl Default for DebugColors {
    fn default() -> Self {
        Self {
            enabled: true,
            inbound: Color::Green,
            call: Color::BrightRed,
            outbound: Color::Yellow,
        }
    }
}

impl DebugColors {
    /// Colors turned off.
    #[inline]
    #[must_use]
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Returns the color for a direction.
    #[inline]
    #[must_use]
    pub const fn for_direction(&self, direction: Direction) -> Color {
        match direction {
            Direction::In => self.inbound,
            Direction::Call => self.call,
            Direction::Out => self.outbound,
        }
    }
}

// ============================================================================
// DebugLogger
// ============================================================================

/// Tagged traffic logger.
///
/// Cheap to clone; clones share the same sink.
#[derive(Clone)]
pub struct DebugLogger {
    enabled: bool,
    colors: DebugColors,
    sink: Sink,
}

impl fmt::Debug for DebugLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLogger")
            .field("enabled", &self.enabled)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl DebugLogger {
    /// Creates a logger writing to stdout.
    #[must_use]
    pub fn new(enabled: bool, colors: DebugColors) -> Self {
        Self::with_writer(enabled, colors, io::stdout())
    }

    /// Creates a logger writing to `writer`.
    #[must_use]
    pub fn with_writer(enabled: bool, colors: DebugColors, writer: impl Write + Send + 'static) -> Self {
        Self {
            enabled,
            colors,
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Creates a logger that drops everything.
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self::with_writer(false, DebugColors::plain(), io::sink())
    }

    /// Returns `true` if lines are being written.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs an inbound frame, tagged `CALL:` if it carries the remote-call
    /// event name and `IN:` otherwise.
    pub fn log_inbound(&self, raw: &str, frame: &Frame) {
        let direction = if frame.is_remote_call_event() {
            Direction::Call
        } else {
            Direction::In
        };
        self.log(direction, raw);
    }

    /// Logs an outbound envelope.
    #[inline]
    pub fn log_outbound(&self, text: &str) {
        self.log(Direction::Out, text);
    }

    /// Writes one tagged line.
    pub fn log(&self, direction: Direction, text: &str) {
        if !self.enabled {
            return;
        }

        debug!(direction = direction.as_str(), frame = %text, "Traffic");

        let line = self.format_line(direction, text);
        let mut sink = self.sink.lock();
        let _ = writeln!(sink, "{line}");
        let _ = sink.flush();
    }

    fn format_line(&self, direction: Direction, text: &str) -> String {
        let line = format!("{}{text}", direction.prefix());

        if self.colors.enabled {
            line.as_str().color(self.colors.for_direction(direction)).to_string()
        } else {
            line
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
