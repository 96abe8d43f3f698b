//! Generic HTTP request execution
//!
//! Sends a prepared `RequestBuilder`, logs the exchange, turns transport
//! failures into [`ApiError`] and retries transient failures with
//! exponential backoff. Envelope decoding stays with the caller.

use reqwest::RequestBuilder;
use std::time::Duration;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Upper bound for a server-provided `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Upper bound for a computed backoff delay.
const MAX_BACKOFF_MS: u64 = 10_000;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text.
    ///
    /// HTTP 429 becomes [`ApiError::RateLimited`] and 502/503/504 become
    /// [`ApiError::NetworkError`] so the retry loop can pick them up. Every
    /// other status is returned to the caller untouched.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ApiError> {
        log::debug!("{method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("Response Status: {status_code}");

        // Read Retry-After before the body consumes the response
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ApiError::RateLimited {
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Server error (HTTP {status_code})");
            return Err(ApiError::NetworkError {
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("Response Body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Performs an HTTP request, retrying transient failures.
    ///
    /// # Retry strategy
    /// - Only [`ApiError::is_retryable`] errors are retried
    /// - `Retry-After` is honoured for rate limiting (capped at 30s)
    /// - Otherwise exponential backoff: 100ms, 200ms, 400ms, ... (capped at 10s)
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ApiError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, method_name, url).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, method_name, url).await;
            };

            match Self::execute_request(req, method_name, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::NetworkError {
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Delay before the next attempt.
fn retry_delay(error: &ApiError, attempt: u32) -> Duration {
    if let ApiError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS))
    } else {
        backoff_delay(attempt)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // keeps 2^attempt in range
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(MAX_BACKOFF_MS))
}
