use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::types::{PagesDomain, WafGroup, WafPackage, ZoneCacheVariants, ZoneCacheVariantsValues};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status of the failed response
    pub status: u16,
    /// Cloudflare error code of the first error entry
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information used while mapping errors (internal use)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Path or identifier of the addressed object, used for `NotFound`
    pub resource: Option<String>,
}

impl ErrorContext {
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
        }
    }
}

/// Maps raw API failures onto [`ApiError`] (internal use)
pub(crate) trait ApiErrorMapper {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ApiError;

    fn parse_error(&self, detail: impl ToString) -> ApiError {
        ApiError::ParseError {
            detail: detail.to_string(),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ApiError {
        ApiError::Unknown {
            status: raw.status,
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Cloudflare API surface consumed by the provider's resources.
///
/// Every method performs one logical request; list methods follow
/// pagination until all pages are fetched.
#[async_trait]
pub trait CloudflareApi: Send + Sync {
    /// Check that the configured credentials are accepted.
    async fn verify_token(&self) -> Result<bool>;

    /// List the WAF packages of a zone.
    async fn list_waf_packages(&self, zone_id: &str) -> Result<Vec<WafPackage>>;

    /// List the rule groups of a WAF package.
    async fn list_waf_groups(&self, zone_id: &str, package_id: &str) -> Result<Vec<WafGroup>>;

    /// Fetch the zone's cache variants.
    async fn zone_cache_variants(&self, zone_id: &str) -> Result<ZoneCacheVariants>;

    /// Replace the given cache variants; unset fields are not sent.
    async fn update_zone_cache_variants(
        &self,
        zone_id: &str,
        values: &ZoneCacheVariantsValues,
    ) -> Result<ZoneCacheVariants>;

    /// Remove all cache variants of the zone.
    async fn delete_zone_cache_variants(&self, zone_id: &str) -> Result<()>;

    /// Fetch one custom domain of a Pages project.
    async fn pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<PagesDomain>;

    /// Attach a custom domain to a Pages project.
    async fn add_pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<PagesDomain>;

    /// Detach a custom domain from a Pages project.
    async fn delete_pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<()>;
}
