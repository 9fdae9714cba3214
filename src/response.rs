//! The successful HTTP exchange, before it is decoded into a typed result.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A 2xx response returned by the dispatcher.
///
/// Keeps the raw body next to the exchange metadata so decode failures can report exactly
/// what the server sent.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The raw response body.
    pub body: String,

    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt being sent to this response arriving, backoff included.
    pub latency: Duration,

    /// Attempts made, `1` when the first one succeeded.
    pub attempts: u32,
}

impl RawResponse {
    /// Returns `true` if the call needed retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] with the raw body if it does not match `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino_ai::RawResponse;
    /// use http::{HeaderMap, StatusCode};
    /// use std::time::Duration;
    ///
    /// let raw = RawResponse {
    ///     body: r#"{"lat": 40.78, "lng": -73.97}"#.to_string(),
    ///     status: StatusCode::OK,
    ///     headers: HeaderMap::new(),
    ///     latency: Duration::from_millis(12),
    ///     attempts: 1,
    /// };
    ///
    /// let coordinate: camino_ai::Coordinate = raw.decode().unwrap();
    /// assert_eq!(coordinate.lat, 40.78);
    /// ```
    pub fn decode<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(|e| {
            tracing::error!(
                error = %e,
                raw_response = %self.body,
                "Failed to decode response"
            );
            self.decode_error(e.to_string())
        })
    }

    /// Builds an [`Error::Decode`] for a body that parsed but failed a semantic check.
    pub(crate) fn decode_error(&self, reason: impl Into<String>) -> Error {
        Error::Decode {
            raw_response: self.body.clone(),
            reason: reason.into(),
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn raw(body: &str) -> RawResponse {
        RawResponse {
            body: body.to_string(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            latency: Duration::from_millis(5),
            attempts: 1,
        }
    }

    #[test]
    fn test_decode_ok() {
        let named: Named = raw(r#"{"name": "Central Perk"}"#).decode().unwrap();
        assert_eq!(named.name, "Central Perk");
    }

    #[test]
    fn test_decode_keeps_raw_body() {
        match raw("invalid json").decode::<Named>() {
            Err(Error::Decode {
                raw_response,
                reason,
                status,
            }) => {
                assert_eq!(raw_response, "invalid json");
                assert!(reason.contains("expected"));
                assert_eq!(status, StatusCode::OK);
            }
            other => panic!("Expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_decode_error() {
        let err = raw(r#"{"title": "x"}"#).decode::<Named>().unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
