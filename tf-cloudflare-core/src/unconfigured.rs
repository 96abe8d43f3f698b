//! API handle used before credentials are known

use async_trait::async_trait;

use tf_cloudflare_api::{
    ApiError, CloudflareApi, PagesDomain, Result, WafGroup, WafPackage, ZoneCacheVariants,
    ZoneCacheVariantsValues,
};

/// Rejects every call. Lets schemas be listed and configuration be
/// validated without a provider block.
pub(crate) struct UnconfiguredApi;

fn unconfigured<T>() -> Result<T> {
    Err(ApiError::InvalidCredentials {
        raw_message: Some("provider is not configured".to_string()),
    })
}

#[async_trait]
impl CloudflareApi for UnconfiguredApi {
    async fn verify_token(&self) -> Result<bool> {
        Ok(false)
    }

    async fn list_waf_packages(&self, _zone_id: &str) -> Result<Vec<WafPackage>> {
        unconfigured()
    }

    async fn list_waf_groups(&self, _zone_id: &str, _package_id: &str) -> Result<Vec<WafGroup>> {
        unconfigured()
    }

    async fn zone_cache_variants(&self, _zone_id: &str) -> Result<ZoneCacheVariants> {
        unconfigured()
    }

    async fn update_zone_cache_variants(
        &self,
        _zone_id: &str,
        _values: &ZoneCacheVariantsValues,
    ) -> Result<ZoneCacheVariants> {
        unconfigured()
    }

    async fn delete_zone_cache_variants(&self, _zone_id: &str) -> Result<()> {
        unconfigured()
    }

    async fn pages_domain(
        &self,
        _account_id: &str,
        _project_name: &str,
        _domain: &str,
    ) -> Result<PagesDomain> {
        unconfigured()
    }

    async fn add_pages_domain(
        &self,
        _account_id: &str,
        _project_name: &str,
        _domain: &str,
    ) -> Result<PagesDomain> {
        unconfigured()
    }

    async fn delete_pages_domain(
        &self,
        _account_id: &str,
        _project_name: &str,
        _domain: &str,
    ) -> Result<()> {
        unconfigured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_is_rejected() {
        let api = UnconfiguredApi;
        assert!(!api.verify_token().await.unwrap());
        let err = api.zone_cache_variants("z1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials { .. }));
    }
}
