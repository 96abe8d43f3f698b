//! Cloudflare error mapping

use crate::error::ApiError;
use crate::traits::{ApiErrorMapper, ErrorContext, RawApiError};

use super::CloudflareClient;

/// Cloudflare error code mapping, falling back to the HTTP status.
/// Reference: <https://developers.cloudflare.com/fundamentals/api/reference/errors/>
impl ApiErrorMapper for CloudflareClient {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ApiError {
        match raw.code.as_deref() {
            // Authentication error
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            Some("6003" | "6103" | "6111" | "9109" | "10000") => ApiError::InvalidCredentials {
                raw_message: Some(raw.message),
            },

            // Object does not exist
            // 7000: No route for that URI
            // 7003: Could not route to /path. perhaps your object identifier is invalid?
            Some("7000" | "7003") => ApiError::NotFound {
                resource: context.resource.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            _ => match raw.status {
                401 => ApiError::InvalidCredentials {
                    raw_message: Some(raw.message),
                },
                403 => ApiError::PermissionDenied {
                    raw_message: Some(raw.message),
                },
                404 => ApiError::NotFound {
                    resource: context.resource.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
                400 | 422 => ApiError::InvalidParameter {
                    param: "request".to_string(),
                    detail: raw.message,
                },
                _ => self.unknown_error(raw),
            },
        }
    }
}
