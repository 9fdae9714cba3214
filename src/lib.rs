//! # camino-ai - client runtime for the Camino location intelligence API
//!
//! Turns typed requests (query, relationship, context, journey, route) into authenticated,
//! retried HTTP exchanges, and turns the responses back into typed results or typed errors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use camino_ai::{Client, Config, Coordinate, JourneyRequest, TransportMode};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), camino_ai::Error> {
//!     let config = Config::builder("my-api-key")
//!         .timeout(Duration::from_secs(10))
//!         .max_retries(3)
//!         .backoff_multiplier(0.5)
//!         .build()?;
//!     let client = Client::new(config)?;
//!
//!     let places = client.search("quiet coffee shops in the West Village").await?;
//!     println!("Found {} places", places.results.len());
//!
//!     let journey = JourneyRequest::new(vec![
//!         Coordinate { lat: 40.7831, lng: -73.9712 }.into(),
//!         "Brooklyn Bridge".into(),
//!         "Times Square".into(),
//!     ])
//!     .with_transport_mode(TransportMode::Walking)
//!     .optimized(true);
//!
//!     let plan = client.journey(&journey).await?;
//!     println!("{:.1} km, stops: {:?}", plan.total_distance / 1000.0, plan.ordered(&journey.waypoints));
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! 429s, 5xx responses, timeouts and connection failures are retried up to `max_retries`
//! times. The wait before retry `n` is `backoff_multiplier × 2^n` seconds, unless the
//! server sent `Retry-After`, which then wins. Other 4xx responses, validation failures and
//! decode failures are returned straight away.
//!
//! ## Errors
//!
//! Every failure is one [`Error`] variant, so callers branch on the variant:
//!
//! ```no_run
//! use camino_ai::{Client, Error, ErrorKind};
//!
//! # async fn example(client: Client) {
//! match client.search("bakeries").await {
//!     Ok(result) => println!("{} results", result.total),
//!     Err(e) if e.kind() == ErrorKind::Authentication => eprintln!("Bad API key"),
//!     Err(Error::Decode { raw_response, reason, .. }) => {
//!         eprintln!("Unexpected body ({}): {}", reason, raw_response);
//!     }
//!     Err(e) => eprintln!("Call failed: {}", e),
//! }
//! # }
//! ```
//!
//! ## Blocking use
//!
//! [`BlockingClient`] exposes the same methods without `async`, for code that does not run
//! an executor.

mod blocking;
mod cancel;
pub mod classify;
mod client;
mod config;
mod dispatch;
mod error;
pub mod models;
pub mod rate_limit;
mod response;
pub mod retry;

pub use blocking::BlockingClient;
pub use cancel::CancelToken;
pub use client::{Client, Endpoint};
pub use config::{ApiKey, Config, ConfigBuilder, DEFAULT_BASE_URL};
pub use dispatch::{Dispatcher, API_KEY_HEADER};
pub use error::{Error, ErrorKind, Result};
pub use models::{
    ContextRequest, ContextResult, Coordinate, JourneyConstraints, JourneyRequest,
    JourneyResult, LocationRef, Metadata, NearbyPlace, Place, QueryRequest, QueryResult,
    RelationshipRequest, RelationshipResult, RelationshipType, RouteRequest, RouteResult,
    Segment, TransportMode, Validate,
};
pub use response::RawResponse;
pub use retry::RetryPolicy;
