//! The retry state machine behind every endpoint call.
//!
//! One [`Dispatcher::execute`] is one logical call. It may make several physical attempts:
//! 429s, 5xx responses and transport failures are retried with exponential backoff until
//! the [`RetryPolicy`](crate::RetryPolicy) runs out, everything else resolves immediately.

use crate::{
    classify::{classify, Outcome, TransportKind},
    rate_limit::RateLimitHint,
    CancelToken, Config, Error, RawResponse, Result,
};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Sends requests to the Camino API and retries transient failures.
///
/// Cloning is cheap. Clones share the connection pool and the [`Config`].
///
/// # Examples
///
/// ```no_run
/// use camino_ai::{Config, Dispatcher};
/// use http::Method;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), camino_ai::Error> {
/// let dispatcher = Dispatcher::new(Arc::new(Config::new("my-api-key")?))?;
/// let body = serde_json::json!({"query": "bakeries"});
///
/// let raw = dispatcher.execute(Method::POST, "/query", Some(&body), None).await?;
/// println!("{} after {} attempts", raw.status, raw.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http_client: reqwest::Client,
    config: Arc<Config>,
}

impl Dispatcher {
    /// Creates a dispatcher with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(config.api_key().expose())
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);
        default_headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        default_headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(config.user_agent())
                .map_err(|_| Error::Config("User agent contains invalid characters".to_string()))?,
        );
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        // Redirects are surfaced as errors; following one would resend the key to
        // whatever host `Location` names.
        let http_client = reqwest::Client::builder()
            .default_headers(default_headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Executes one logical call, retrying transient failures.
    ///
    /// `cancel`, when given, aborts the call at the next send, receive or backoff sleep and
    /// resolves it to [`Error::Cancelled`]. The configured deadline, when set, does the same
    /// but resolves to [`Error::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt once retrying stops.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        cancel: Option<&CancelToken>,
    ) -> Result<RawResponse> {
        let url = self.url_for(path)?;
        let policy = self.config.retry_policy();
        let deadline = self
            .config
            .deadline()
            .map(|budget| tokio::time::Instant::now() + budget);
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_some_and(|token| token.is_cancelled()) {
                return Err(Error::Cancelled);
            }

            let attempt_result = guard(
                self.send_once(&method, &url, body, attempt, started),
                deadline,
                cancel,
            )
            .await?;

            let error = match attempt_result {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !policy.should_retry(&error, attempt) {
                tracing::error!(
                    error = %error,
                    attempts = attempt + 1,
                    method = %method,
                    path = %path,
                    "Request failed"
                );
                return Err(error);
            }

            // A server-supplied Retry-After replaces the computed backoff.
            let delay = match error.retry_after() {
                Some(retry_after) => retry_after,
                None => policy.delay_for_attempt(attempt).unwrap_or_default(),
            };

            tracing::warn!(
                error = %error,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                method = %method,
                path = %path,
                "Retrying request after delay"
            );

            guard(tokio::time::sleep(delay), deadline, cancel).await?;
            attempt += 1;
        }
    }

    /// Makes a single attempt. Non-2xx responses come back classified.
    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&serde_json::Value>,
        attempt: u32,
        started: Instant,
    ) -> Result<RawResponse> {
        tracing::debug!(
            method = %method,
            url = %url,
            attempt = attempt + 1,
            "Executing HTTP request"
        );

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .timeout(self.config.timeout());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(transport_error)?;
        let latency = started.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            attempts = attempt + 1,
            "Received HTTP response"
        );

        if status.is_success() {
            return Ok(RawResponse {
                body,
                status,
                headers,
                latency,
                attempts: attempt + 1,
            });
        }

        let retry_after = if status == http::StatusCode::TOO_MANY_REQUESTS {
            RateLimitHint::from_headers(&headers).delay(self.config.max_retry_after())
        } else {
            None
        };

        Err(classify(Outcome::Status {
            status,
            body: &body,
            retry_after,
        }))
    }

    /// Resolves an endpoint path against the base URL, keeping any base path prefix.
    fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.config.base_url();
        let joined = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = base.clone();
        url.set_path(&joined);
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("Cannot resolve {} against {}", path, base)));
        }
        Ok(url)
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    classify(Outcome::Transport {
        kind: TransportKind::from(&error),
        message: error.to_string(),
    })
}

/// Races `future` against the overall deadline and the cancel token.
async fn guard<F>(
    future: F,
    deadline: Option<tokio::time::Instant>,
    cancel: Option<&CancelToken>,
) -> Result<F::Output>
where
    F: Future,
{
    let expired = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };
    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Err(Error::Cancelled),
        _ = expired => Err(Error::Timeout {
            message: "deadline exceeded".to_string(),
        }),
        output = future => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn dispatcher(base_url: &str) -> Dispatcher {
        let config = Config::builder("test-key")
            .base_url(base_url)
            .unwrap()
            .build()
            .unwrap();
        Dispatcher::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_url_for_joins_paths() {
        let d = dispatcher("https://api.getcamino.ai");
        assert_eq!(
            d.url_for("/query").unwrap().as_str(),
            "https://api.getcamino.ai/query"
        );

        let d = dispatcher("https://gateway.example.com/camino/v1/");
        assert_eq!(
            d.url_for("route").unwrap().as_str(),
            "https://gateway.example.com/camino/v1/route"
        );
    }

    #[tokio::test]
    async fn test_guard_passes_output_through() {
        let value = guard(async { 7 }, None, None).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_guard_deadline() {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(20);
        let result = guard(
            tokio::time::sleep(Duration::from_secs(10)),
            Some(deadline),
            None,
        )
        .await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_guard_cancel_wins_over_ready_future() {
        let token = CancelToken::new();
        token.cancel();
        let result = guard(async { 7 }, None, Some(&token)).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
