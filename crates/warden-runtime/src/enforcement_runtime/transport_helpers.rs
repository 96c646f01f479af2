//! Retry and error-shaping helpers shared by every tracker request.

use std::time::Duration;

/// Backoff never sleeps longer than this between attempts, whatever the
/// attempt count or server-advertised delay multiplier.
const RETRY_DELAY_CAP_MS: u64 = 30_000;

const BACKOFF_EXPONENT_CEILING: u32 = 10;

/// A 429 or any 5xx is worth retrying; everything else (auth, missing
/// resource, validation) will not improve on a second attempt.
pub(crate) fn is_retryable_tracker_status(status: u16) -> bool {
    status == 429 || status >= 500
}

pub(crate) fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

/// Seconds-form `Retry-After` only; HTTP-date values are ignored and fall
/// back to exponential backoff.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Delay before the next attempt: the server-requested wait when present
/// (floored at the configured base), otherwise exponential backoff on the
/// base delay. Either path is capped at [`RETRY_DELAY_CAP_MS`].
pub(crate) fn retry_delay(
    base_delay_ms: u64,
    attempt: usize,
    retry_after: Option<Duration>,
) -> Duration {
    let cap = Duration::from_millis(RETRY_DELAY_CAP_MS);
    match retry_after {
        Some(requested) => requested.max(Duration::from_millis(base_delay_ms)).min(cap),
        None => {
            let exponent = attempt.saturating_sub(1).min(BACKOFF_EXPONENT_CEILING as usize) as u32;
            let scaled = base_delay_ms.saturating_mul(1_u64 << exponent);
            Duration::from_millis(scaled).min(cap)
        }
    }
}

/// Clip an error body for inclusion in a failure message, counting chars so
/// multi-byte text never splits mid-codepoint.
pub(crate) fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::{
        is_retryable_tracker_status, is_retryable_transport_error, parse_retry_after, retry_delay,
        truncate_for_error,
    };
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
    use std::time::Duration;

    fn headers_with_retry_after(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn unit_retryable_status_covers_rate_limit_and_server_errors_only() {
        for status in [429_u16, 500, 502, 599] {
            assert!(is_retryable_tracker_status(status), "{status}");
        }
        for status in [200_u16, 304, 401, 403, 404, 422] {
            assert!(!is_retryable_tracker_status(status), "{status}");
        }
    }

    #[test]
    fn unit_parse_retry_after_accepts_seconds_only() {
        assert_eq!(
            parse_retry_after(&headers_with_retry_after(" 7 ")),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            parse_retry_after(&headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT")),
            None
        );
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[test]
    fn functional_retry_delay_doubles_per_attempt_until_the_cap() {
        assert_eq!(retry_delay(250, 1, None), Duration::from_millis(250));
        assert_eq!(retry_delay(250, 2, None), Duration::from_millis(500));
        assert_eq!(retry_delay(250, 4, None), Duration::from_millis(2_000));
        assert_eq!(retry_delay(25_000, 2, None), Duration::from_millis(30_000));
        assert_eq!(retry_delay(250, 64, None), Duration::from_millis(30_000));
    }

    #[test]
    fn functional_retry_delay_honors_server_request_within_bounds() {
        // Requested wait wins when longer than the base.
        assert_eq!(
            retry_delay(250, 1, Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
        // Base floors a too-eager server.
        assert_eq!(
            retry_delay(500, 1, Some(Duration::from_millis(10))),
            Duration::from_millis(500)
        );
        // Cap bounds an absurd one.
        assert_eq!(
            retry_delay(500, 1, Some(Duration::from_secs(600))),
            Duration::from_millis(30_000)
        );
    }

    #[test]
    fn unit_truncate_for_error_counts_chars_not_bytes() {
        assert_eq!(truncate_for_error("première", 4), "prem...");
        assert_eq!(truncate_for_error("short", 80), "short");
        assert_eq!(truncate_for_error("", 0), "");
    }

    #[tokio::test]
    async fn unit_transport_error_classification_flags_connect_failures() {
        // Nothing listens on a reserved port, so this fails at connect time.
        let error = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .timeout(Duration::from_millis(500))
            .send()
            .await
            .expect_err("connect should fail");
        assert!(is_retryable_transport_error(&error));
    }
}
