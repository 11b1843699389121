//! Handler registration.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::BoxError;

// ============================================================================
// Types
// ============================================================================

/// Result returned by a handler body.
pub type HandlerResult = Result<(), BoxError>;

/// Type-erased handler taking the remote call's `parameter`.
pub type Handler = Arc<dyn Fn(Value) -> Invocation + Send + Sync>;

// ============================================================================
// Invocation
// ============================================================================

/// What a handler produced when called.
pub enum Invocation {
    /// The handler ran to completion synchronously.
    Completed(HandlerResult),
    /// The handler returned work still to run.
    Deferred(BoxFuture<'static, HandlerResult>),
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(result) => f.debug_tuple("Completed").field(result).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

// ============================================================================
// HandlerTable
// ============================================================================

/// Handlers by exact name.
///
/// Supplied once at startup and read-only afterwards.
///
/// # Example
///
/// ```ignore
/// use neutralino_bridge::HandlerTable;
///
/// let handlers = HandlerTable::new()
///     .handler("ping", |parameter| {
///         println!("ping {parameter}");
///         Ok(())
///     })
///     .async_handler("longRun", |_| async move {
///         tokio::time::sleep(std::time::Duration::from_secs(1)).await;
///         HandlerResult::Ok(())
///     });
/// ```
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: FxHashMap<String, Handler>,
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl HandlerTable {
    /// Creates an empty table.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a synchronous handler, replacing any with the same name.
    #[must_use]
    pub fn handler<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> HandlerResult + Send + Sync + 'static,
    {
        self.raw(name, Arc::new(move |parameter| Invocation::Completed(handler(parameter))))
    }

    /// Registers an asynchronous handler, replacing any with the same name.
    #[must_use]
    pub fn async_handler<F, Fut>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.raw(name, Arc::new(move |parameter| Invocation::Deferred(handler(parameter).boxed())))
    }

    /// Registers a type-erased handler.
    #[must_use]
    pub fn raw(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Looks up a handler by exact name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    /// Returns `true` if a handler is registered under `name`.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the number of handlers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_registration() {
        let table = HandlerTable::new()
            .handler("ping", |_| Ok(()))
            .async_handler("longRun", |_| async { HandlerResult::Ok(()) });

        assert_eq!(table.len(), 2);
        assert!(table.contains("ping"));
        assert!(table.contains("longRun"));
        assert!(!table.contains("Ping"));

        let mut names: Vec<_> = table.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["longRun", "ping"]);
    }

    #[test]
    fn test_sync_handler_completes() {
        let table = HandlerTable::new().handler("fail", |parameter| {
            Err(format!("bad parameter {parameter}").into())
        });

        let handler = table.get("fail").unwrap();
        match handler(json!(1)) {
            Invocation::Completed(Err(e)) => assert_eq!(e.to_string(), "bad parameter 1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_async_handler_is_deferred() {
        let table = HandlerTable::new().async_handler("echo", |parameter| async move {
            assert_eq!(parameter, json!("x"));
            HandlerResult::Ok(())
        });

        let Invocation::Deferred(future) = table.get("echo").unwrap()(json!("x")) else {
            panic!("expected deferred");
        };
        tokio_test::assert_ok!(tokio_test::block_on(future));
    }

    #[test]
    fn test_later_registration_wins() {
        let table = HandlerTable::new()
            .handler("ping", |_| Err("first".into()))
            .handler("ping", |_| Ok(()));

        assert_eq!(table.len(), 1);
        assert!(matches!(
            table.get("ping").unwrap()(Value::Null),
            Invocation::Completed(Ok(()))
        ));
    }
}
