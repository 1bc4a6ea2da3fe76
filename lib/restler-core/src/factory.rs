//! Producing clients for annotated service interfaces.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::dispatch::Shared;
use crate::{
    ControllerMarker, DefaultInvocationMapper, Dispatcher, Error, HttpInvocationExecutor,
    InvocationMapper, MethodDescription, Result, ServiceConfig,
};

/// A service interface a client can be produced for.
///
/// Implemented by the client type `#[restler]` generates for a trait.
pub trait ServiceInterface: Sized {
    /// Interface name, used in logs and errors.
    const NAME: &'static str;

    /// Controller marker carried by the interface, if any.
    const MARKER: Option<ControllerMarker>;

    /// Static descriptions of every remote method.
    fn methods() -> &'static [MethodDescription];

    /// Build the client around a dispatcher.
    fn from_dispatcher(dispatcher: Dispatcher) -> Self;
}

/// Produces clients sharing one service configuration and worker pool.
///
/// # Example
///
/// ```ignore
/// let factory = ClientFactory::new(config)?;
/// let users: UserApiClient = factory.produce_client()?;
/// ```
#[derive(Clone)]
pub struct ClientFactory {
    shared: Arc<Shared>,
}

impl ClientFactory {
    /// Factory with the default mapper, spawning deferred work on the
    /// current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when called outside a tokio runtime.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Create a new factory builder.
    #[must_use]
    pub fn builder(config: ServiceConfig) -> ClientFactoryBuilder {
        ClientFactoryBuilder {
            config,
            mapper: None,
            workers: None,
        }
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        self.shared.executor.config()
    }

    /// Produce the client for `C`.
    ///
    /// No network activity happens here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] if `C` carries no controller marker.
    pub fn produce_client<C: ServiceInterface>(&self) -> Result<C> {
        let Some(marker) = C::MARKER else {
            warn!(interface = C::NAME, "refusing to produce client without controller marker");
            return Err(Error::invalid_target(C::NAME, "not a controller"));
        };

        debug!(
            interface = C::NAME,
            ?marker,
            methods = C::methods().len(),
            "producing client"
        );
        Ok(C::from_dispatcher(Dispatcher::new(
            Arc::clone(&self.shared),
            C::NAME,
        )))
    }
}

impl std::fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFactory")
            .field("config", self.config())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ClientFactory`].
pub struct ClientFactoryBuilder {
    config: ServiceConfig,
    mapper: Option<Arc<dyn InvocationMapper>>,
    workers: Option<Handle>,
}

impl ClientFactoryBuilder {
    /// Replace the [`DefaultInvocationMapper`].
    #[must_use]
    pub fn mapper(mut self, mapper: impl InvocationMapper + 'static) -> Self {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// Replace the [`DefaultInvocationMapper`] with a shared mapper.
    #[must_use]
    pub fn shared_mapper(mut self, mapper: Arc<dyn InvocationMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Runtime deferred invocations are spawned on.
    #[must_use]
    pub fn worker_pool(mut self, workers: Handle) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Build the factory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no worker pool was given and no
    /// tokio runtime is running.
    pub fn build(self) -> Result<ClientFactory> {
        let workers = match self.workers {
            Some(workers) => workers,
            None => Handle::try_current()
                .map_err(|err| Error::configuration(format!("no worker pool: {err}")))?,
        };

        Ok(ClientFactory {
            shared: Arc::new(Shared {
                executor: HttpInvocationExecutor::new(Arc::new(self.config)),
                mapper: self
                    .mapper
                    .unwrap_or_else(|| Arc::new(DefaultInvocationMapper)),
                workers,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::{
        Argument, Callable, DeferredResult, ExecutionStrategy, Method, ParamLocation, ParamMeta,
        Request, RequestExecutor, Response, ResponseFuture,
    };

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct User {
        id: u64,
    }

    /// Answers `{"id": <last segment>}` once the gate lets it through.
    struct Counting {
        calls: AtomicUsize,
        gate: Semaphore,
    }

    impl Counting {
        fn open() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Semaphore::new(Semaphore::MAX_PERMITS),
            })
        }

        fn closed() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Semaphore::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RequestExecutor for Counting {
        fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_> {
            Box::pin(async move {
                let _permit = self
                    .gate
                    .acquire()
                    .await
                    .map_err(|err| Error::connection(err.to_string()))?;
                self.calls.fetch_add(1, Ordering::SeqCst);
                let id = request
                    .url()
                    .path_segments()
                    .and_then(Iterator::last)
                    .unwrap_or_default()
                    .to_string();
                Ok(Response::new(200, HashMap::new(), Bytes::from(format!(r#"{{"id":{id}}}"#))))
            })
        }
    }

    const ID: &[ParamMeta] = &[ParamMeta {
        name: "id",
        location: ParamLocation::Path,
        type_name: "Option<u64>",
        required: false,
    }];

    const fn describe(name: &'static str, return_type: &'static str, strategy: ExecutionStrategy) -> MethodDescription {
        MethodDescription {
            name,
            http_method: Method::Get,
            uri_template: "/users/{id}",
            return_type,
            strategy,
            params: ID,
        }
    }

    static GET_USER: MethodDescription = describe("get_user", "User", ExecutionStrategy::Direct);
    static GET_USER_LATER: MethodDescription =
        describe("get_user_later", "DeferredResult", ExecutionStrategy::Deferred);
    static GET_USER_LAZILY: MethodDescription =
        describe("get_user_lazily", "Callable", ExecutionStrategy::Lazy);
    static METHODS: [MethodDescription; 3] = [
        describe("get_user", "User", ExecutionStrategy::Direct),
        describe("get_user_later", "DeferredResult", ExecutionStrategy::Deferred),
        describe("get_user_lazily", "Callable", ExecutionStrategy::Lazy),
    ];

    #[derive(Debug, Clone)]
    struct UserApiClient {
        dispatcher: Dispatcher,
    }

    impl UserApiClient {
        async fn get_user(&self, id: Option<u64>) -> Result<User> {
            self.dispatcher.direct(&GET_USER, vec![Argument::optional(id)]).await
        }

        fn get_user_later(&self, id: Option<u64>) -> DeferredResult<User> {
            self.dispatcher.deferred(&GET_USER_LATER, vec![Argument::optional(id)])
        }

        fn get_user_lazily(&self, id: Option<u64>) -> Callable<User> {
            self.dispatcher.callable(&GET_USER_LAZILY, vec![Argument::optional(id)])
        }
    }

    impl ServiceInterface for UserApiClient {
        const NAME: &'static str = "UserApi";
        const MARKER: Option<ControllerMarker> = Some(ControllerMarker::RestController);

        fn methods() -> &'static [MethodDescription] {
            &METHODS
        }

        fn from_dispatcher(dispatcher: Dispatcher) -> Self {
            Self { dispatcher }
        }
    }

    #[derive(Debug)]
    struct PlainClient;

    impl ServiceInterface for PlainClient {
        const NAME: &'static str = "Plain";
        const MARKER: Option<ControllerMarker> = None;

        fn methods() -> &'static [MethodDescription] {
            &[]
        }

        fn from_dispatcher(_dispatcher: Dispatcher) -> Self {
            Self
        }
    }

    fn config(executor: &Arc<Counting>) -> ServiceConfig {
        ServiceConfig::builder()
            .base_url("https://api.example.com")
            .shared_executor(executor.clone())
            .build()
            .expect("config")
    }

    fn client(executor: &Arc<Counting>) -> UserApiClient {
        ClientFactory::new(config(executor))
            .expect("factory")
            .produce_client()
            .expect("client")
    }

    #[test]
    fn factory_requires_worker_pool() {
        let err = ClientFactory::new(config(&Counting::open())).expect_err("no runtime");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn produce_client_requires_marker() {
        let executor = Counting::open();
        let factory = ClientFactory::new(config(&executor)).expect("factory");

        let err = factory.produce_client::<PlainClient>().expect_err("no marker");
        assert!(err.is_invalid_target());
        assert_eq!(err.to_string(), "invalid target `Plain`: not a controller");
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn produce_client_sends_nothing() {
        let executor = Counting::open();
        let client = client(&executor);

        assert_eq!(client.dispatcher.interface(), "UserApi");
        assert_eq!(UserApiClient::methods().len(), 3);
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn direct_call_executes_once() {
        let executor = Counting::open();
        let user = client(&executor).get_user(Some(42)).await.expect("user");

        assert_eq!(user, User { id: 42 });
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn direct_call_missing_path_variable() {
        let executor = Counting::open();
        let err = client(&executor).get_user(None).await.expect_err("no id");

        assert!(err.is_mapping());
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn deferred_returns_before_execution() {
        let executor = Counting::closed();
        let handle = client(&executor).get_user_later(Some(7));

        tokio::task::yield_now().await;
        assert!(!handle.is_resolved());
        assert_eq!(executor.calls(), 0);

        executor.gate.add_permits(1);
        let user = handle.wait().await.as_ref().expect("user");
        assert_eq!(user, &User { id: 7 });
        assert_eq!(executor.calls(), 1);
        assert!(handle.is_resolved());
    }

    #[tokio::test]
    async fn deferred_mapping_failure_resolves_immediately() {
        let executor = Counting::open();
        let handle = client(&executor).get_user_later(None);

        assert!(handle.try_get().is_some_and(|result| result.as_ref().is_err_and(Error::is_mapping)));
        assert_eq!(executor.calls(), 0);
    }

    #[test]
    fn deferred_abandoned_on_runtime_shutdown() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let executor = Counting::closed();
        let factory = ClientFactory::builder(config(&executor))
            .worker_pool(runtime.handle().clone())
            .build()
            .expect("factory");
        let client: UserApiClient = factory.produce_client().expect("client");

        let handle = client.get_user_later(Some(1));
        drop(runtime);

        assert!(matches!(handle.try_get(), Some(Err(Error::Abandoned))));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn callable_executes_on_each_call() {
        let executor = Counting::open();
        let callable = client(&executor).get_user_lazily(Some(3));
        assert_eq!(callable.method().name, "get_user_lazily");
        assert_eq!(executor.calls(), 0);

        assert_eq!(callable.call().await.expect("first"), User { id: 3 });
        assert_eq!(callable.call().await.expect("second"), User { id: 3 });
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn callable_surfaces_mapping_error_on_call() {
        let executor = Counting::open();
        let callable = client(&executor).get_user_lazily(None);

        let err = callable.call().await.expect_err("no id");
        assert!(err.is_mapping());
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_calls_each_execute() {
        let executor = Counting::open();
        let client = client(&executor);

        let mut tasks = tokio::task::JoinSet::new();
        for id in 0..16 {
            let client = client.clone();
            tasks.spawn(async move { client.get_user(Some(id)).await });
        }

        let mut ids = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            ids.push(joined.expect("join").expect("user").id);
        }
        ids.sort_unstable();

        assert_eq!(ids, (0..16).collect::<Vec<_>>());
        assert_eq!(executor.calls(), 16);
    }

    #[tokio::test]
    async fn custom_mapper_is_used() {
        let executor = Counting::open();
        let factory = ClientFactory::builder(config(&executor))
            .mapper(|method: &'static MethodDescription, _args: Vec<Argument>| {
                Ok::<_, Error>(crate::ServiceMethodInvocation::new(method, Vec::new()).path_variable("id", "99"))
            })
            .build()
            .expect("factory");
        let client: UserApiClient = factory.produce_client().expect("client");

        assert_eq!(client.get_user(None).await.expect("user"), User { id: 99 });
    }
}
