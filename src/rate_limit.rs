//! Parsing of server rate limit hints.
//!
//! A 429 response usually says how long to back off. The dispatcher prefers that hint over
//! its own exponential schedule.

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Backoff hints carried by a rate limited response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitHint {
    /// Wait requested through `Retry-After`.
    pub retry_after: Option<Duration>,

    /// Window reset time from `X-RateLimit-Reset` / `RateLimit-Reset`.
    pub reset_at: Option<SystemTime>,
}

impl RateLimitHint {
    /// Reads the hint headers from a response.
    ///
    /// `Retry-After` may be delta-seconds or an HTTP date. The reset headers are Unix
    /// timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino_ai::rate_limit::RateLimitHint;
    /// use http::HeaderMap;
    /// use std::time::Duration;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("retry-after", "60".parse().unwrap());
    ///
    /// let hint = RateLimitHint::from_headers(&headers);
    /// assert_eq!(hint.retry_after, Some(Duration::from_secs(60)));
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            retry_after: parse_retry_after(headers),
            reset_at: parse_reset(headers),
        }
    }

    /// Returns how long to wait, capped at `max_wait`.
    ///
    /// `Retry-After` wins over the reset time. Returns `None` when the response carried no
    /// usable hint, or the reset time is already in the past.
    pub fn delay(&self, max_wait: Duration) -> Option<Duration> {
        if let Some(retry_after) = self.retry_after {
            return Some(retry_after.min(max_wait));
        }

        let until_reset = self.reset_at?.duration_since(SystemTime::now()).ok()?;
        Some(until_reset.min(max_wait))
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // An HTTP date in the past means "retry now".
    let at = httpdate::parse_http_date(value).ok()?;
    Some(at.duration_since(SystemTime::now()).unwrap_or(Duration::ZERO))
}

fn parse_reset(headers: &HeaderMap) -> Option<SystemTime> {
    ["x-ratelimit-reset", "ratelimit-reset"]
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok()?.trim().parse::<u64>().ok())
        .map(|timestamp| UNIX_EPOCH + Duration::from_secs(timestamp))
        .next()
}
