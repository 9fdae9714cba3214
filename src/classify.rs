//! Maps raw call outcomes onto the [`Error`] taxonomy.
//!
//! Classification is pure: it looks at a status code, a body and the parsed rate limit
//! hint, or at a transport failure, and never performs I/O.

use crate::Error;
use http::StatusCode;
use std::time::Duration;

/// What went wrong below HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The attempt exceeded its timeout.
    Timeout,
    /// DNS, connect, reset or any other connection-level failure.
    Connection,
}

/// A failed attempt, before classification.
#[derive(Debug, Clone)]
pub enum Outcome<'a> {
    /// The server answered with a non-2xx status.
    Status {
        status: StatusCode,
        body: &'a str,
        retry_after: Option<Duration>,
    },
    /// No usable response came back.
    Transport { kind: TransportKind, message: String },
}

impl From<&reqwest::Error> for TransportKind {
    fn from(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportKind::Timeout
        } else {
            TransportKind::Connection
        }
    }
}

/// Resolves an outcome to exactly one taxonomy member.
pub fn classify(outcome: Outcome<'_>) -> Error {
    match outcome {
        Outcome::Transport {
            kind: TransportKind::Timeout,
            message,
        } => Error::Timeout { message },
        Outcome::Transport {
            kind: TransportKind::Connection,
            message,
        } => Error::Network { message },
        Outcome::Status {
            status,
            body,
            retry_after,
        } => {
            let json = serde_json::from_str::<serde_json::Value>(body).ok();
            let message = server_message(json.as_ref(), body, status);

            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::Authentication { status, message }
                }
                StatusCode::TOO_MANY_REQUESTS => Error::RateLimit {
                    message,
                    retry_after,
                },
                _ => Error::Api {
                    status,
                    message,
                    body: json,
                },
            }
        }
    }
}

fn server_message(json: Option<&serde_json::Value>, body: &str, status: StatusCode) -> String {
    let from_json = json.and_then(|value| {
        ["message", "detail", "error"]
            .iter()
            .find_map(|key| value.get(*key)?.as_str())
    });

    match from_json {
        Some(message) => message.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn status(status: u16, body: &str) -> Error {
        classify(Outcome::Status {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            retry_after: None,
        })
    }

    #[test]
    fn test_auth_statuses() {
        let err = status(401, r#"{"message": "Invalid API key"}"#);
        match err {
            Error::Authentication { status, message } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("Expected Authentication, got {:?}", other),
        }
        assert_eq!(status(403, "").kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_rate_limit_keeps_retry_after() {
        let err = classify(Outcome::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: r#"{"message": "Rate limit exceeded"}"#,
            retry_after: Some(Duration::from_secs(60)),
        });
        match err {
            Error::RateLimit {
                message,
                retry_after,
            } => {
                assert_eq!(message, "Rate limit exceeded");
                assert_eq!(retry_after, Some(Duration::from_secs(60)));
            }
            other => panic!("Expected RateLimit, got {:?}", other),
        }
    }

    #[test]
    fn test_other_statuses_are_api_errors() {
        match status(500, r#"{"detail": "Internal server error"}"#) {
            Error::Api {
                status,
                message,
                body,
            } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "Internal server error");
                assert!(body.is_some());
            }
            other => panic!("Expected Api, got {:?}", other),
        }

        match status(404, "no such thing") {
            Error::Api { message, body, .. } => {
                assert_eq!(message, "no such thing");
                assert!(body.is_none());
            }
            other => panic!("Expected Api, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        match status(502, "") {
            Error::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("Expected Api, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_failures() {
        let timeout = classify(Outcome::Transport {
            kind: TransportKind::Timeout,
            message: "operation timed out".to_string(),
        });
        assert_eq!(timeout.kind(), ErrorKind::Timeout);

        let refused = classify(Outcome::Transport {
            kind: TransportKind::Connection,
            message: "connection refused".to_string(),
        });
        assert_eq!(refused.kind(), ErrorKind::Network);
        assert!(refused.is_retryable());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let body = r#"{"error": "boom"}"#;
        assert_eq!(status(503, body).to_string(), status(503, body).to_string());
    }
}
