//! Interception handler behind every generated client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::{
    Argument, Callable, DeferredResult, HttpInvocationExecutor, InvocationMapper,
    MethodDescription, Result, ServiceMethodInvocation,
};

/// State shared by every client produced from one factory.
pub(crate) struct Shared {
    pub(crate) executor: HttpInvocationExecutor,
    pub(crate) mapper: Arc<dyn InvocationMapper>,
    pub(crate) workers: Handle,
}

/// Routes intercepted calls of a generated client through mapping and
/// execution.
///
/// Keeps no per-call state; clones share the factory state.
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
    interface: &'static str,
}

impl Dispatcher {
    pub(crate) const fn new(shared: Arc<Shared>, interface: &'static str) -> Self {
        Self { shared, interface }
    }

    /// Name of the interface this dispatcher serves.
    #[must_use]
    pub const fn interface(&self) -> &'static str {
        self.interface
    }

    fn map(
        &self,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Result<ServiceMethodInvocation> {
        self.shared.mapper.map(method, args).inspect_err(|err| {
            warn!(interface = self.interface, method = method.name, error = %err, "invocation mapping failed");
        })
    }

    /// Map and execute on the caller's task.
    ///
    /// # Errors
    ///
    /// Returns the mapping, URI, authentication, transport, status or
    /// decoding error of this call.
    pub async fn direct<T: DeserializeOwned>(
        &self,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Result<T> {
        debug!(interface = self.interface, method = method.name, strategy = %method.strategy, "dispatching");
        let invocation = self.map(method, args)?;
        self.shared.executor.execute(invocation).await
    }

    /// Map on the caller's task, then execute on the worker pool.
    ///
    /// Returns at once. A mapping failure resolves the handle immediately
    /// without spawning.
    pub fn deferred<T>(&self, method: &'static MethodDescription, args: Vec<Argument>) -> DeferredResult<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        debug!(interface = self.interface, method = method.name, strategy = %method.strategy, "dispatching");
        let (handle, completer) = DeferredResult::pending();

        match self.map(method, args) {
            Ok(invocation) => {
                let shared = Arc::clone(&self.shared);
                self.shared.workers.spawn(async move {
                    let result = shared.executor.execute(invocation).await;
                    completer.complete(result);
                });
            }
            Err(err) => completer.complete(Err(err)),
        }

        handle
    }

    /// Capture the call; nothing runs until [`Callable::call`].
    #[must_use]
    pub fn callable<T: DeserializeOwned>(
        &self,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Callable<T> {
        debug!(interface = self.interface, method = method.name, strategy = %method.strategy, "dispatching");
        Callable::new(self.clone(), method, args)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("interface", &self.interface)
            .field("config", self.shared.executor.config())
            .finish_non_exhaustive()
    }
}
