//! Extension entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Extension`] | Runs the bridge for one process lifetime |
//! | [`ExtensionBuilder`] | Fluent configuration builder |
//! | [`ExtensionOptions`] | Debug and lifecycle options |
//! | [`Messenger`] | Sends events to the UI |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for extension configuration.
pub mod builder;

/// Core extension implementation.
pub mod core;

/// Outbound event sending.
pub mod messenger;

/// Runtime options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ExtensionBuilder;
pub use core::Extension;
pub use messenger::Messenger;
pub use options::ExtensionOptions;
