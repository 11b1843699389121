//! Remote-call dispatch.
//!
//! The UI layer asks the extension to run a named function by sending a
//! `runBun` frame. The [`Dispatcher`] looks the name up in the
//! [`HandlerTable`] supplied at startup and invokes it:
//!
//! ```text
//! {"event":"runBun","data":{"function":"ping","parameter":"x"}}
//!        │
//!        ▼
//! HandlerTable["ping"]("x") ──► Invocation::Completed(..)  reported now
//!                          └──► Invocation::Deferred(fut)  spawned, reported later
//! ```
//!
//! Unknown names are ignored. Handler failures (errors and panics) are
//! logged and never reach the receive loop.

// ============================================================================
// Submodules
// ============================================================================

/// Dispatcher and invocation outcomes.
pub mod dispatcher;

/// Handler registration.
pub mod handlers;

// ============================================================================
// Re-exports
// ============================================================================

pub use dispatcher::{Dispatch, Dispatcher};
pub use handlers::{Handler, HandlerResult, HandlerTable, Invocation};
