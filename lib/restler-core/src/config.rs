//! Service configuration shared by every client of a factory.

use std::sync::Arc;

use url::Url;

use crate::{AuthenticationStrategy, Error, NoAuthentication, RequestExecutor, Result};

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("restler/", env!("CARGO_PKG_VERSION"));

/// Immutable settings for reaching one remote service.
#[derive(Clone)]
pub struct ServiceConfig {
    base_url: Url,
    executor: Arc<dyn RequestExecutor>,
    authentication: Arc<dyn AuthenticationStrategy>,
    user_agent: String,
}

impl ServiceConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Base URL every route is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Executor sending concrete requests.
    #[must_use]
    pub fn executor(&self) -> &Arc<dyn RequestExecutor> {
        &self.executor
    }

    /// Strategy wrapping every request.
    #[must_use]
    pub fn authentication(&self) -> &dyn AuthenticationStrategy {
        self.authentication.as_ref()
    }

    /// `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Default)]
pub struct ServiceConfigBuilder {
    base_url: Option<String>,
    executor: Option<Arc<dyn RequestExecutor>>,
    authentication: Option<Arc<dyn AuthenticationStrategy>>,
    user_agent: Option<String>,
}

impl ServiceConfigBuilder {
    /// Set the base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request executor (required).
    #[must_use]
    pub fn executor(mut self, executor: impl RequestExecutor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Set a shared request executor (required).
    #[must_use]
    pub fn shared_executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the authentication strategy, [`NoAuthentication`] by default.
    #[must_use]
    pub fn authentication(mut self, strategy: impl AuthenticationStrategy + 'static) -> Self {
        self.authentication = Some(Arc::new(strategy));
        self
    }

    /// Set a shared authentication strategy.
    #[must_use]
    pub fn shared_authentication(mut self, strategy: Arc<dyn AuthenticationStrategy>) -> Self {
        self.authentication = Some(strategy);
        self
    }

    /// Set the `User-Agent`, [`DEFAULT_USER_AGENT`] by default.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the base URL or the executor is
    /// missing, and [`Error::InvalidBaseUrl`] if the base URL does not parse.
    pub fn build(self) -> Result<ServiceConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("base URL is required"))?;
        let base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "`{base_url}` cannot be used as a base URL"
            )));
        }

        let executor = self
            .executor
            .ok_or_else(|| Error::configuration("request executor is required"))?;

        Ok(ServiceConfig {
            base_url,
            executor,
            authentication: self
                .authentication
                .unwrap_or_else(|| Arc::new(NoAuthentication)),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
