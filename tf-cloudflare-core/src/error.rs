//! Unified error type definition

use thiserror::Error;

// Re-export library error types
pub use tf_cloudflare_api::{ApiError, CredentialValidationError};

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// No resource is registered under this type name
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// No data source is registered under this type name
    #[error("Unknown data source type: {0}")]
    UnknownDataSource(String),

    /// A filter pattern failed to compile
    #[error("Invalid filter pattern for '{attribute}': {source}")]
    InvalidFilter {
        attribute: String,
        #[source]
        source: regex::Error,
    },

    /// State or configuration does not match the resource model
    #[error("Malformed state for {type_name}: {source}")]
    InvalidState {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Import identifier has the wrong shape
    #[error("Invalid import ID '{id}', expected {expected}")]
    InvalidImportId { id: String, expected: String },

    /// The object disappeared right after being written
    #[error("{type_name} '{id}' was not found after apply")]
    Vanished { type_name: String, id: String },

    /// Credential validation errors
    #[error("{0}")]
    CredentialValidation(#[from] CredentialValidationError),

    /// Provider configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API call failed
    #[error("{context}: {source}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },
}

impl CoreError {
    /// Whether it is expected behavior (user input, missing objects), used for log classification.
    ///
    /// `true` is logged at `warn`, `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Api { source, .. } => source.is_expected(),
            Self::Vanished { .. } => false,
            _ => true,
        }
    }

    /// Attribute path the error relates to, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::InvalidFilter { attribute, .. } => Some(attribute),
            _ => None,
        }
    }
}

impl From<ApiError> for CoreError {
    fn from(source: ApiError) -> Self {
        Self::Api {
            context: "Cloudflare API request failed".to_string(),
            source,
        }
    }
}

/// Attach human context to a failed API call.
pub trait ApiResultExt<T> {
    fn context<F, S>(self, f: F) -> CoreResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn context<F, S>(self, f: F) -> CoreResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| CoreError::Api {
            context: f().into(),
            source,
        })
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_context_is_prefixed() {
        let result: Result<(), ApiError> = Err(ApiError::Timeout {
            detail: "30s elapsed".to_string(),
        });
        let err = result
            .context(|| "error reading cache variants for zone \"abc\"")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error reading cache variants for zone \"abc\": Request timeout: 30s elapsed"
        );
        assert!(!err.is_expected());
    }

    #[test]
    fn invalid_filter_reports_attribute() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = CoreError::InvalidFilter {
            attribute: "filter.0.name".to_string(),
            source,
        };
        assert_eq!(err.attribute(), Some("filter.0.name"));
        assert!(err.is_expected());
    }
}
