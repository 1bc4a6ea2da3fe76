//! Single-assignment handle completed by a worker.

use std::sync::{Arc, OnceLock};

use tokio::sync::Notify;

use crate::{Error, Result};

struct Inner<T> {
    value: OnceLock<Result<T>>,
    resolved: Notify,
}

/// Result of a deferred invocation, resolved exactly once by a worker.
///
/// Cloning shares the same cell; any number of readers may wait on it.
pub struct DeferredResult<T> {
    inner: Arc<Inner<T>>,
}

impl<T> DeferredResult<T> {
    /// Create an unresolved handle together with the only completer for it.
    pub(crate) fn pending() -> (Self, Completer<T>) {
        let inner = Arc::new(Inner {
            value: OnceLock::new(),
            resolved: Notify::new(),
        });
        let completer = Completer {
            inner: Some(Arc::clone(&inner)),
        };
        (Self { inner }, completer)
    }

    /// A handle already resolved with `result`.
    #[must_use]
    pub fn resolved(result: Result<T>) -> Self {
        let (handle, completer) = Self::pending();
        completer.complete(result);
        handle
    }

    /// Whether the handle has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.value.get().is_some()
    }

    /// The outcome if already resolved.
    #[must_use]
    pub fn try_get(&self) -> Option<&Result<T>> {
        self.inner.value.get()
    }

    /// Wait until the handle is resolved and borrow the outcome.
    pub async fn wait(&self) -> &Result<T> {
        loop {
            let notified = self.inner.resolved.notified();
            if let Some(result) = self.inner.value.get() {
                return result;
            }
            notified.await;
        }
    }
}

impl<T> Clone for DeferredResult<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DeferredResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredResult")
            .field("value", &self.inner.value.get())
            .finish()
    }
}

/// Write side of a [`DeferredResult`].
///
/// Dropping it unresolved resolves the handle with [`Error::Abandoned`].
pub(crate) struct Completer<T> {
    inner: Option<Arc<Inner<T>>>,
}

impl<T> Completer<T> {
    pub(crate) fn complete(mut self, result: Result<T>) {
        if let Some(inner) = self.inner.take() {
            resolve(&inner, result);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            resolve(&inner, Err(Error::Abandoned));
        }
    }
}

fn resolve<T>(inner: &Inner<T>, result: Result<T>) {
    // the completer is unique, so the cell is always empty here
    let _ = inner.value.set(result);
    inner.resolved.notify_waiters();
}
