//! Entry point wiring a transport, credentials and a worker pool into a
//! [`ClientFactory`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::{
    AuthenticationStrategy, ClientConfig, ClientFactory, HyperClient, InvocationMapper,
    RequestExecutor, Result, ServiceConfig,
};

/// Builder for a [`ClientFactory`] talking to one remote service.
///
/// Without an explicit executor a [`HyperClient`] is created from the
/// [`ClientConfig`] (defaults when none is given).
///
/// # Example
///
/// ```no_run
/// use restler::{BearerAuthentication, Restler};
///
/// # async fn run() -> restler::Result<()> {
/// let factory = Restler::new("https://api.example.com")
///     .authentication(BearerAuthentication::new("my-token"))
///     .build()?;
/// # let _ = factory;
/// # Ok(())
/// # }
/// ```
pub struct Restler {
    base_url: String,
    executor: Option<Arc<dyn RequestExecutor>>,
    client_config: Option<ClientConfig>,
    authentication: Option<Arc<dyn AuthenticationStrategy>>,
    user_agent: Option<String>,
    mapper: Option<Arc<dyn InvocationMapper>>,
    workers: Option<Handle>,
}

impl std::fmt::Debug for Restler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Restler")
            .field("base_url", &self.base_url)
            .field("client_config", &self.client_config)
            .field("custom_executor", &self.executor.is_some())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Restler {
    /// Start configuring clients for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            executor: None,
            client_config: None,
            authentication: None,
            user_agent: None,
            mapper: None,
            workers: None,
        }
    }

    /// Send requests through `executor` instead of a new [`HyperClient`].
    #[must_use]
    pub fn executor(mut self, executor: impl RequestExecutor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Send requests through a preconfigured [`HyperClient`].
    #[must_use]
    pub fn client(self, client: HyperClient) -> Self {
        self.executor(client)
    }

    /// Transport settings of the default [`HyperClient`].
    ///
    /// Ignored when an executor is set.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.client_config = Some(config);
        self
    }

    /// Wrap every request with `strategy`.
    #[must_use]
    pub fn authentication(mut self, strategy: impl AuthenticationStrategy + 'static) -> Self {
        self.authentication = Some(Arc::new(strategy));
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the default invocation mapper.
    #[must_use]
    pub fn mapper(mut self, mapper: impl InvocationMapper + 'static) -> Self {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// Runtime deferred invocations are spawned on; the current one by default.
    #[must_use]
    pub fn worker_pool(mut self, workers: Handle) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Build the factory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBaseUrl`] or
    /// [`crate::Error::Configuration`] for an unusable base URL, and
    /// [`crate::Error::Configuration`] when no worker pool is given outside
    /// a tokio runtime.
    pub fn build(self) -> Result<ClientFactory> {
        let executor: Arc<dyn RequestExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(HyperClient::with_config(
                self.client_config.unwrap_or_default(),
            )),
        };

        let mut config = ServiceConfig::builder()
            .base_url(self.base_url)
            .shared_executor(executor);
        if let Some(strategy) = self.authentication {
            config = config.shared_authentication(strategy);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.user_agent(user_agent);
        }
        let config = config.build()?;
        debug!(base_url = %config.base_url(), "service configured");

        let mut factory = ClientFactory::builder(config);
        if let Some(mapper) = self.mapper {
            factory = factory.shared_mapper(mapper);
        }
        if let Some(workers) = self.workers {
            factory = factory.worker_pool(workers);
        }
        factory.build()
    }
}
