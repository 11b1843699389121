//! Extension coordinator.
//!
//! The [`Extension`] wires the pieces together for one process lifetime:
//!
//! ```text
//! handshake ─► Channel::open ─► Channel::run ─┬─► LifecycleController (exit)
//!                                             ├─► DebugLogger (IN/CALL)
//!                                             └─► Dispatcher ─► handlers
//!                                                                 │
//!                     Channel ◄── Messenger::send_message ◄───────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use neutralino_bridge::{Extension, HandlerTable};
//!
//! # async fn example() -> neutralino_bridge::Result<()> {
//! let extension = Extension::builder().debug(true).build();
//! let messenger = extension.messenger();
//!
//! let handlers = HandlerTable::new().handler("ping", move |parameter| {
//!     messenger.send_message("pingResult", format!("PONG, in reply to {parameter}"))?;
//!     Ok(())
//! });
//!
//! extension.start(handlers).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::info;

use crate::debug::DebugLogger;
use crate::dispatch::{Dispatcher, HandlerTable};
use crate::error::Result;
use crate::handshake::{ConnectionParameters, resolve_from_process};
use crate::lifecycle::{Flow, LifecycleController};
use crate::transport::{Channel, Termination};

use super::builder::ExtensionBuilder;
use super::messenger::Messenger;
use super::options::ExtensionOptions;

// ============================================================================
// Extension
// ============================================================================

/// The extension side of the shell bridge.
///
/// Consumed by [`start`](Self::start) or [`run`](Self::run): one channel
/// per process, no reconnection.
pub struct Extension {
    options: ExtensionOptions,
    channel: Channel,
    messenger: Messenger,
    debug: DebugLogger,
}

// ============================================================================
// Extension - Display
// ============================================================================

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("options", &self.options)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Extension - Public API
// ============================================================================

impl Extension {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::new()
    }

    pub(crate) fn new(options: ExtensionOptions, debug: DebugLogger) -> Self {
        let channel = Channel::new();
        let messenger = Messenger::new(channel.handle(), debug.clone());

        Self {
            options,
            channel,
            messenger,
            debug,
        }
    }

    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ExtensionOptions {
        &self.options
    }

    /// Returns a messenger for sending events to the UI.
    ///
    /// Sends fail with a warning until the channel is open.
    #[inline]
    #[must_use]
    pub fn messenger(&self) -> Messenger {
        self.messenger.clone()
    }

    /// Resolves the handshake from this process's arguments or stdin,
    /// then runs the bridge.
    ///
    /// Exits the process with status 0 on a lifecycle signal (unless
    /// disabled). Returns when the channel closes or fails; the host
    /// process may keep running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the handshake
    /// fails. No connection is attempted in that case.
    pub async fn start(self, handlers: HandlerTable) -> Result<Termination> {
        let params = resolve_from_process().await?;

        match self.run(params, handlers).await {
            Termination::Lifecycle(signal) => LifecycleController::exit(signal),
            termination => Ok(termination),
        }
    }

    /// Runs the bridge with already-resolved parameters.
    ///
    /// Unlike [`start`](Self::start), never exits the process: a lifecycle
    /// signal is returned as [`Termination::Lifecycle`].
    pub async fn run(self, params: ConnectionParameters, handlers: HandlerTable) -> Termination {
        let Self {
            options,
            mut channel,
            messenger,
            debug,
        } = self;

        messenger.bind_token(params.access_token());
        info!(
            extension_id = params.extension_id(),
            port = params.port(),
            handlers = handlers.len(),
            "Extension starting"
        );

        channel.open(&params).await;

        let lifecycle = LifecycleController::new(options.terminate_on_window_close);
        let dispatcher = Dispatcher::new(handlers);

        channel
            .run(move |raw, frame| {
                if let Flow::Terminate(signal) = lifecycle.observe(&frame) {
                    return Flow::Terminate(signal);
                }

                debug.log_inbound(raw, &frame);
                dispatcher.dispatch(&frame);
                Flow::Continue
            })
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    use crate::transport::ChannelState;

    #[test]
    fn test_messenger_available_before_start() {
        let extension = Extension::builder().debug_writer(io::sink()).build();
        let messenger = extension.messenger();

        assert!(!messenger.is_connected());
        assert_eq!(extension.channel.state(), ChannelState::Unconnected);
    }

    #[tokio::test]
    async fn test_run_without_shell_returns() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let extension = Extension::builder().debug_writer(io::sink()).build();
        let messenger = extension.messenger();
        let params = ConnectionParameters::new(port, "tok", None, "ext");

        assert_eq!(
            extension.run(params, HandlerTable::new()).await,
            Termination::NeverOpened
        );
        assert!(messenger.send_message("late", ()).is_err());
    }
}
