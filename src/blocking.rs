//! Blocking adapter over the async [`Client`].
//!
//! Each call runs the async pipeline to completion on a private current-thread runtime, so
//! validation, retry and classification behave exactly as they do for [`Client`].

use crate::{
    CancelToken, Client, Config, ContextRequest, ContextResult, Error, JourneyRequest,
    JourneyResult, QueryRequest, QueryResult, RelationshipRequest, RelationshipResult, Result,
    RouteRequest, RouteResult,
};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// A client whose calls block the current thread until they resolve.
///
/// Must not be used from inside an async runtime; use [`Client`] there.
///
/// # Examples
///
/// ```no_run
/// use camino_ai::{BlockingClient, Config, RouteRequest, TransportMode};
///
/// # fn example() -> Result<(), camino_ai::Error> {
/// let client = BlockingClient::new(Config::new("my-api-key")?)?;
///
/// let route = client.route(
///     &RouteRequest::new("Central Park", "Times Square").with_transport_mode(TransportMode::Walking),
/// )?;
/// println!("{:.0} m in {:?}", route.distance, route.travel_time());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BlockingClient {
    inner: Client,
    runtime: Arc<Runtime>,
}

impl BlockingClient {
    /// Creates a blocking client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client or the runtime cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build runtime: {}", e)))?;

        Ok(Self {
            inner: Client::new(config)?,
            runtime: Arc::new(runtime),
        })
    }

    /// Returns a clone whose calls are aborted when `token` is cancelled from another thread.
    pub fn with_cancel_token(&self, token: CancelToken) -> Self {
        Self {
            inner: self.inner.with_cancel_token(token),
            runtime: Arc::clone(&self.runtime),
        }
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    /// The async client this adapter drives.
    pub fn as_async(&self) -> &Client {
        &self.inner
    }

    pub fn query(&self, request: &QueryRequest) -> Result<QueryResult> {
        self.block_on(self.inner.query(request))
    }

    pub fn search(&self, text: impl Into<String>) -> Result<QueryResult> {
        self.block_on(self.inner.search(text))
    }

    pub fn relationship(&self, request: &RelationshipRequest) -> Result<RelationshipResult> {
        self.block_on(self.inner.relationship(request))
    }

    pub fn context(&self, request: &ContextRequest) -> Result<ContextResult> {
        self.block_on(self.inner.context(request))
    }

    pub fn journey(&self, request: &JourneyRequest) -> Result<JourneyResult> {
        self.block_on(self.inner.journey(request))
    }

    pub fn route(&self, request: &RouteRequest) -> Result<RouteResult> {
        self.block_on(self.inner.route(request))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
