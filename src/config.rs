//! Client settings.
//!
//! A [`Config`] is validated once when built and never changes afterwards. Clients share it
//! behind an `Arc`, so concurrent calls read it without locking.

use crate::{Error, Result, RetryPolicy};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Production endpoint of the Camino API.
pub const DEFAULT_BASE_URL: &str = "https://api.getcamino.ai";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// An API key. Its `Debug` output is redacted so it never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns the key itself, for building the auth header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Immutable client settings.
///
/// # Examples
///
/// ```
/// use camino_ai::Config;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), camino_ai::Error> {
/// let config = Config::builder("my-api-key")
///     .base_url("https://staging.example.com")?
///     .timeout(Duration::from_secs(10))
///     .max_retries(5)
///     .backoff_multiplier(0.5)
///     .build()?;
///
/// assert_eq!(config.retry_policy().max_retries, 5);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    api_key: ApiKey,
    base_url: Url,
    timeout: Duration,
    retry_policy: RetryPolicy,
    max_retry_after: Duration,
    deadline: Option<Duration>,
    user_agent: String,
}

impl Config {
    /// Creates a config with default settings for the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Creates a builder seeded with the given API key.
    pub fn builder(api_key: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(api_key)
    }

    /// The API key sent with every request.
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Base URL that endpoint paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Timeout for a single attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry count and backoff settings.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Longest server-requested `Retry-After` the dispatcher will honor.
    pub fn max_retry_after(&self) -> Duration {
        self.max_retry_after
    }

    /// Wall-clock budget for one logical call, across all attempts and backoff.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Builder for [`Config`].
#[derive(Debug)]
pub struct ConfigBuilder {
    api_key: ApiKey,
    base_url: Option<Url>,
    timeout: Duration,
    retry_policy: RetryPolicy,
    max_retry_after: Duration,
    deadline: Option<Duration>,
    user_agent: String,
}

impl ConfigBuilder {
    /// Creates a builder with the default endpoint, a 30s timeout and 3 retries starting
    /// at one second.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey(api_key.into()),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            max_retry_after: DEFAULT_MAX_RETRY_AFTER,
            deadline: None,
            user_agent: concat!("camino-ai-rust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Sets the base URL all endpoint paths are resolved against.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())
            .map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Base URL must be http or https, got {}",
                url.scheme()
            )));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the timeout for each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many retries follow a transient failure.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry_policy.max_retries = max_retries;
        self
    }

    /// Sets the first backoff delay in seconds. Each retry doubles it.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.retry_policy.backoff_multiplier = multiplier;
        self
    }

    /// Enables random jitter on backoff delays.
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.retry_policy.jitter = jitter;
        self
    }

    /// Caps how long a server `Retry-After` can make the client wait.
    pub fn max_retry_after(mut self, max_wait: Duration) -> Self {
        self.max_retry_after = max_wait;
        self
    }

    /// Sets an overall deadline per call. Expiry resolves the call to a timeout error.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the settings and builds the [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API key is blank, the timeout or deadline is zero,
    /// or the backoff multiplier is not a positive finite number.
    pub fn build(self) -> Result<Config> {
        if self.api_key.expose().trim().is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("Timeout must be positive".to_string()));
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(Error::Config("Deadline must be positive".to_string()));
        }
        let multiplier = self.retry_policy.backoff_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(Error::Config(format!(
                "Backoff multiplier must be positive, got {}",
                multiplier
            )));
        }
        http::HeaderValue::from_str(self.api_key.expose())
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        http::HeaderValue::from_str(&self.user_agent)
            .map_err(|_| Error::Config("User agent contains invalid characters".to_string()))?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?,
        };

        Ok(Config {
            api_key: self.api_key,
            base_url,
            timeout: self.timeout,
            retry_policy: self.retry_policy,
            max_retry_after: self.max_retry_after,
            deadline: self.deadline,
            user_agent: self.user_agent,
        })
    }
}
