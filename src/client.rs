//! Async client exposing one method per Camino capability.
//!
//! Every method runs the same pipeline: validate the request locally, dispatch it with
//! retries, then decode and range-check the response.

use crate::{
    models::{
        CheckDecoded, ContextRequest, ContextResult, JourneyRequest, JourneyResult,
        QueryRequest, QueryResult, RelationshipRequest, RelationshipResult, RouteRequest,
        RouteResult, Validate,
    },
    CancelToken, Config, Dispatcher, Error, Result,
};
use http::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// The Camino endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Query,
    Relationship,
    Context,
    Journey,
    Route,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Query => "/query",
            Endpoint::Relationship => "/relationship",
            Endpoint::Context => "/context",
            Endpoint::Journey => "/journey",
            Endpoint::Route => "/route",
        }
    }
}

/// An async client for the Camino API.
///
/// The client owns its [`Config`] and holds no other state between calls, so one client
/// can serve any number of concurrent calls, and several differently configured clients
/// can live in one process.
///
/// # Examples
///
/// ```no_run
/// use camino_ai::{Client, Config, Coordinate, QueryRequest};
///
/// # async fn example() -> Result<(), camino_ai::Error> {
/// let client = Client::new(Config::new("my-api-key")?)?;
///
/// let request = QueryRequest::new("coffee shops")
///     .with_location(Coordinate { lat: 40.7831, lng: -73.9712 })
///     .with_radius(500.0);
///
/// let result = client.query(&request).await?;
/// for place in &result.results {
///     println!("{} ({:?})", place.name, place.confidence);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher,
    cancel: Option<CancelToken>,
}

impl Client {
    /// Creates a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(config))?,
            cancel: None,
        })
    }

    /// Returns a clone of this client whose calls are aborted when `token` is cancelled.
    ///
    /// The clone shares the connection pool and config with the original.
    pub fn with_cancel_token(&self, token: CancelToken) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            cancel: Some(token),
        }
    }

    pub fn config(&self) -> &Config {
        self.dispatcher.config()
    }

    /// The dispatcher behind the endpoint methods, for calling paths this client does not
    /// wrap.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Searches for places matching a natural language query.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResult> {
        self.call(Endpoint::Query, request).await
    }

    /// Shorthand for [`query`](Self::query) with nothing but the query text.
    pub async fn search(&self, text: impl Into<String>) -> Result<QueryResult> {
        self.query(&QueryRequest::new(text)).await
    }

    /// Computes the spatial relationship between two locations.
    pub async fn relationship(&self, request: &RelationshipRequest) -> Result<RelationshipResult> {
        self.call(Endpoint::Relationship, request).await
    }

    /// Describes the area around a location.
    pub async fn context(&self, request: &ContextRequest) -> Result<ContextResult> {
        self.call(Endpoint::Context, request).await
    }

    /// Plans a multi-stop journey.
    ///
    /// A non-empty `optimized_order` in the result is guaranteed to be a permutation of
    /// the request's waypoint indices.
    pub async fn journey(&self, request: &JourneyRequest) -> Result<JourneyResult> {
        let (raw, result) = self
            .call_raw::<_, JourneyResult>(Endpoint::Journey, request)
            .await?;

        let order_len = result.optimized_order.len();
        if order_len != 0 && order_len != request.waypoints.len() {
            return Err(raw.decode_error(format!(
                "optimized_order has {} entries for {} waypoints",
                order_len,
                request.waypoints.len()
            )));
        }
        Ok(result)
    }

    /// Computes a route between two locations.
    pub async fn route(&self, request: &RouteRequest) -> Result<RouteResult> {
        self.call(Endpoint::Route, request).await
    }

    async fn call<Req, Res>(&self, endpoint: Endpoint, request: &Req) -> Result<Res>
    where
        Req: Validate + Serialize,
        Res: DeserializeOwned + CheckDecoded,
    {
        self.call_raw(endpoint, request)
            .await
            .map(|(_, result)| result)
    }

    async fn call_raw<Req, Res>(
        &self,
        endpoint: Endpoint,
        request: &Req,
    ) -> Result<(crate::RawResponse, Res)>
    where
        Req: Validate + Serialize,
        Res: DeserializeOwned + CheckDecoded,
    {
        request.validate()?;
        let body = serde_json::to_value(request)
            .map_err(|e| Error::validation("request", format!("cannot serialize: {}", e)))?;

        let raw = self
            .dispatcher
            .execute(
                Method::POST,
                endpoint.path(),
                Some(&body),
                self.cancel.as_ref(),
            )
            .await?;

        let result: Res = raw.decode()?;
        if let Err(reason) = result.check_decoded() {
            tracing::error!(
                reason = %reason,
                path = endpoint.path(),
                "Response failed range checks"
            );
            return Err(raw.decode_error(reason));
        }
        Ok((raw, result))
    }
}
