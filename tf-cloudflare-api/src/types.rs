use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Response Envelope ============

/// Cloudflare v4 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareErrorEntry>,
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareErrorEntry {
    pub code: i64,
    pub message: String,
}

/// Pagination block of list responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultInfo {
    #[allow(dead_code)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

// ============ WAF ============

/// A WAF rule package of a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WafPackage {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detection_mode: String,
    #[serde(default)]
    pub sensitivity: String,
    #[serde(default)]
    pub action_mode: String,
}

/// A rule group inside a WAF package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WafGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub rules_count: i64,
    #[serde(default)]
    pub modified_rules_count: i64,
    #[serde(default)]
    pub package_id: String,
}

// ============ Zone Cache Variants ============

/// Per-extension content-type variants served from cache.
///
/// Every field is optional; unset fields are left out of the request body so
/// a `PATCH` only touches what the caller provided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCacheVariantsValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avif: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmp: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gif: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpeg: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpg: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jp2: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpg2: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tif: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiff: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webp: Option<Vec<String>>,
}

/// The zone's cache variants setting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneCacheVariants {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: ZoneCacheVariantsValues,
    #[serde(default)]
    pub editable: bool,
    #[serde(default, with = "crate::utils::datetime")]
    pub modified_on: Option<DateTime<Utc>>,
}

// ============ Pages ============

/// A custom domain attached to a Pages project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagesDomain {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub zone_tag: Option<String>,
    #[serde(default, with = "crate::utils::datetime")]
    pub created_on: Option<DateTime<Utc>>,
}

// ============ Credential Types ============

/// Validation error for client credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// No authentication method was configured.
    Missing,
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Machine-readable field key.
        field: String,
    },
    /// More than one authentication method was configured.
    Conflicting {
        /// Field keys of the competing methods.
        fields: Vec<String>,
    },
    /// A field only valid together with another one was given alone.
    Incomplete {
        /// The field that was given.
        field: String,
        /// The field it requires.
        requires: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "One of api_token or api_key must be set"),
            Self::EmptyField { field } => write!(f, "Field must not be empty: {field}"),
            Self::Conflicting { fields } => {
                write!(f, "Only one of {} may be set", fields.join(", "))
            }
            Self::Incomplete { field, requires } => {
                write!(f, "{field} requires {requires} to be set")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Authentication material for the Cloudflare API.
///
/// ```json
/// { "method": "api_token", "api_token": "..." }
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Credentials {
    /// Scoped API token, sent as a bearer token.
    ApiToken {
        /// Cloudflare API token.
        api_token: String,
    },
    /// Global API key, sent with the account email.
    ApiKey {
        /// Account email address.
        email: String,
        /// Global API key.
        api_key: String,
    },
}

impl Credentials {
    /// Build credentials from the optional provider fields.
    pub fn from_parts(
        api_token: Option<&str>,
        api_key: Option<&str>,
        email: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        match (api_token, api_key) {
            (Some(_), Some(_)) => Err(CredentialValidationError::Conflicting {
                fields: vec!["api_token".to_string(), "api_key".to_string()],
            }),
            (Some(token), None) => Ok(Self::ApiToken {
                api_token: Self::non_empty("api_token", token)?,
            }),
            (None, Some(key)) => {
                let Some(email) = email else {
                    return Err(CredentialValidationError::Incomplete {
                        field: "api_key".to_string(),
                        requires: "email".to_string(),
                    });
                };
                Ok(Self::ApiKey {
                    email: Self::non_empty("email", email)?,
                    api_key: Self::non_empty("api_key", key)?,
                })
            }
            (None, None) => Err(CredentialValidationError::Missing),
        }
    }

    fn non_empty(field: &str, value: &str) -> Result<String, CredentialValidationError> {
        if value.trim().is_empty() {
            Err(CredentialValidationError::EmptyField {
                field: field.to_string(),
            })
        } else {
            Ok(value.to_string())
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiToken { .. } => f
                .debug_struct("ApiToken")
                .field("api_token", &"<redacted>")
                .finish(),
            Self::ApiKey { email, .. } => f
                .debug_struct("ApiKey")
                .field("email", email)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}
