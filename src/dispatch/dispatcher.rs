//! Dispatcher and invocation outcomes.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::error::Error;
use crate::protocol::{Frame, RemoteCall};

use super::{HandlerResult, HandlerTable, Invocation};

// ============================================================================
// Dispatch
// ============================================================================

/// Outcome of offering one frame to the dispatcher.
#[derive(Debug)]
pub enum Dispatch {
    /// The frame is not a remote-call request.
    Ignored,
    /// No handler is registered under the requested name.
    Unhandled {
        /// Requested handler name.
        function: String,
    },
    /// A synchronous handler returned successfully.
    Completed,
    /// A synchronous handler failed or panicked; already reported.
    Failed,
    /// An asynchronous handler is running in its own task.
    ///
    /// The task never yields an error; failures are reported inside it.
    Spawned(JoinHandle<()>),
}

impl Dispatch {
    /// Returns `true` if a handler was invoked.
    #[inline]
    #[must_use]
    pub const fn invoked(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Spawned(_))
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes remote-call frames to registered handlers.
///
/// Never blocks on an asynchronous handler: its future is spawned onto the
/// runtime and observed only for error reporting.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    handlers: Arc<HandlerTable>,
}

impl Dispatcher {
    /// Creates a dispatcher over a fixed handler table.
    #[inline]
    #[must_use]
    pub fn new(handlers: HandlerTable) -> Self {
        Self {
            handlers: Arc::new(handlers),
        }
    }

    /// Returns the handler table.
    #[inline]
    #[must_use]
    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// Offers a frame; invokes at most one handler.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, frame: &Frame) -> Dispatch {
        match frame {
            Frame::RemoteCall(call) => self.invoke(call),
            _ => Dispatch::Ignored,
        }
    }

    fn invoke(&self, call: &RemoteCall) -> Dispatch {
        let Some(handler) = self.handlers.get(&call.function) else {
            trace!(function = %call.function, "No handler registered, ignoring");
            return Dispatch::Unhandled {
                function: call.function.clone(),
            };
        };

        let parameter = call.parameter.clone();
        let invocation = match catch_unwind(AssertUnwindSafe(|| handler(parameter))) {
            Ok(invocation) => invocation,
            Err(payload) => {
                report(&call.function, &panic_message(payload.as_ref()));
                return Dispatch::Failed;
            }
        };

        match invocation {
            Invocation::Completed(Ok(())) => {
                debug!(function = %call.function, "Handler completed");
                Dispatch::Completed
            }
            Invocation::Completed(Err(e)) => {
                report(&call.function, &e.to_string());
                Dispatch::Failed
            }
            Invocation::Deferred(future) => {
                let handle = tokio::spawn(observe(call.function.clone(), future));
                Dispatch::Spawned(handle)
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Awaits a deferred handler and reports its outcome.
async fn observe(function: String, future: BoxFuture<'static, HandlerResult>) {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(())) => debug!(%function, "Handler completed"),
        Ok(Err(e)) => report(&function, &e.to_string()),
        Err(payload) => report(&function, &panic_message(payload.as_ref())),
    }
}

fn report(function: &str, message: &str) {
    let err = Error::handler(function, message);
    error!(function, error = %err, "Handler failed");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
