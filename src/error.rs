//! Error types for Camino API calls.
//!
//! Every failure a call can produce is one variant of [`Error`]. Callers branch on the
//! variant (or on [`Error::kind`]) instead of matching on messages.

use http::StatusCode;
use std::time::Duration;

/// The closed set of failures a client call can resolve to.
///
/// # Examples
///
/// ```no_run
/// use camino_ai::{Client, Config, Error, QueryRequest};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new(Config::new("my-api-key")?)?;
///
/// match client.query(&QueryRequest::new("coffee near the park")).await {
///     Ok(result) => println!("{} places", result.results.len()),
///     Err(Error::RateLimit { retry_after, .. }) => {
///         eprintln!("Slow down, server asked for {:?}", retry_after);
///     }
///     Err(Error::Authentication { message, .. }) => eprintln!("Check the API key: {}", message),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request failed local checks. No network call was made.
    #[error("Validation error on `{field}`: {message}")]
    Validation {
        /// The offending request field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The server rejected the credentials (HTTP 401 or 403). Never retried.
    #[error("Authentication failed (status {status}): {message}")]
    Authentication {
        /// The HTTP status code
        status: StatusCode,
        /// The server message
        message: String,
    },

    /// The server kept answering 429 until retries ran out.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// The server message
        message: String,
        /// Wait requested by the server through `Retry-After`, whole seconds precision
        retry_after: Option<Duration>,
    },

    /// Connection-level failure (DNS, refused, reset) after retries ran out.
    #[error("Network error: {message}")]
    Network {
        /// Description of the transport failure
        message: String,
    },

    /// An attempt timed out, or the overall deadline expired.
    #[error("Request timed out: {message}")]
    Timeout {
        /// Which timeout fired
        message: String,
    },

    /// The response body did not have the expected shape.
    ///
    /// The raw body is kept so the mismatch can be debugged.
    #[error("Failed to decode response (status {status}): {reason}")]
    Decode {
        /// The raw response body
        raw_response: String,
        /// Why decoding failed
        reason: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Any other non-2xx status after retries ran out.
    #[error("API error {status}: {message}")]
    Api {
        /// The HTTP status code
        status: StatusCode,
        /// The server message
        message: String,
        /// The response body, when it was JSON
        body: Option<serde_json::Value>,
    },

    /// The client could not be constructed from the supplied settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The call was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("Request cancelled")]
    Cancelled,
}

/// Discriminant of [`Error`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Decode,
    Api,
    Config,
    Cancelled,
}

impl Error {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Network { .. } => ErrorKind::Network,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Api { .. } => ErrorKind::Api,
            Error::Config(_) => ErrorKind::Config,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns `true` if the dispatcher may retry after this error.
    ///
    /// Transport failures, per-attempt timeouts, 429 and 5xx responses are transient.
    /// Everything else is the caller's problem and is surfaced immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino_ai::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::BAD_GATEWAY,
    ///     message: "upstream down".to_string(),
    ///     body: None,
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::NOT_FOUND,
    ///     message: "no such place".to_string(),
    ///     body: None,
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } | Error::Timeout { .. } | Error::RateLimit { .. } => true,
            Error::Api { status, .. } => status.is_server_error(),
            Error::Validation { .. }
            | Error::Authentication { .. }
            | Error::Decode { .. }
            | Error::Config(_)
            | Error::Cancelled => false,
        }
    }

    /// Returns the HTTP status code if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Authentication { status, .. }
            | Error::Decode { status, .. }
            | Error::Api { status, .. } => Some(*status),
            Error::RateLimit { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }

    /// Returns the server-requested wait for rate limit errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns the raw response body for decode failures.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Camino API calls.
pub type Result<T> = std::result::Result<T, Error>;
