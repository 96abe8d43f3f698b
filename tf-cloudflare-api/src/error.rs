use serde::{Deserialize, Serialize};

/// Unified error type for all Cloudflare API operations.
///
/// Variants carry enough context to render a useful diagnostic and are
/// serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The authenticated token lacks permission for the requested operation.
    PermissionDenied {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The addressed object does not exist (HTTP 404 or an equivalent error code).
    NotFound {
        /// Path or identifier of the missing object.
        resource: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The API rejected a request parameter.
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// An unrecognized error from the API.
    Unknown {
        /// HTTP status code of the failed response.
        status: u16,
        /// Raw Cloudflare error code, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ApiError {
    /// Whether the error is expected behavior (bad input, missing object, etc.).
    ///
    /// Callers log `true` at `warn` and `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether the addressed object is absent on the remote side.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether a retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::PermissionDenied { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Permission denied: {msg}")
                } else {
                    write!(f, "Permission denied")
                }
            }
            Self::NotFound {
                resource,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "'{resource}' not found: {msg}")
                } else {
                    write!(f, "'{resource}' not found")
                }
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::Unknown {
                status,
                raw_code,
                raw_message,
            } => match raw_code {
                Some(code) => write!(f, "HTTP {status} (code {code}): {raw_message}"),
                None => write!(f, "HTTP {status}: {raw_message}"),
            },
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
