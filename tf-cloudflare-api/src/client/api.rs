//! `CloudflareApi` implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::error::{ApiError, Result};
use crate::traits::CloudflareApi;
use crate::types::{
    Credentials, PagesDomain, WafGroup, WafPackage, ZoneCacheVariants, ZoneCacheVariantsValues,
};

use super::CloudflareClient;

fn waf_packages_path(zone_id: &str) -> String {
    format!("/zones/{}/firewall/waf/packages", encode(zone_id))
}

fn cache_variants_path(zone_id: &str) -> String {
    format!("/zones/{}/cache/variants", encode(zone_id))
}

fn pages_domains_path(account_id: &str, project_name: &str) -> String {
    format!(
        "/accounts/{}/pages/projects/{}/domains",
        encode(account_id),
        encode(project_name)
    )
}

#[async_trait]
impl CloudflareApi for CloudflareClient {
    async fn verify_token(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct VerifyResponse {
            status: String,
        }

        let outcome = match &self.credentials {
            Credentials::ApiToken { .. } => self
                .get::<VerifyResponse>("/user/tokens/verify")
                .await
                .map(|resp| resp.status == "active"),
            Credentials::ApiKey { .. } => self
                .get::<serde_json::Value>("/user")
                .await
                .map(|_| true),
        };

        match outcome {
            Err(ApiError::InvalidCredentials { .. } | ApiError::PermissionDenied { .. }) => {
                Ok(false)
            }
            other => other,
        }
    }

    async fn list_waf_packages(&self, zone_id: &str) -> Result<Vec<WafPackage>> {
        self.get_all_pages(&waf_packages_path(zone_id)).await
    }

    async fn list_waf_groups(&self, zone_id: &str, package_id: &str) -> Result<Vec<WafGroup>> {
        let path = format!(
            "{}/{}/groups",
            waf_packages_path(zone_id),
            encode(package_id)
        );
        let mut groups: Vec<WafGroup> = self.get_all_pages(&path).await?;
        for group in &mut groups {
            if group.package_id.is_empty() {
                group.package_id = package_id.to_string();
            }
        }
        Ok(groups)
    }

    async fn zone_cache_variants(&self, zone_id: &str) -> Result<ZoneCacheVariants> {
        self.get(&cache_variants_path(zone_id)).await
    }

    async fn update_zone_cache_variants(
        &self,
        zone_id: &str,
        values: &ZoneCacheVariantsValues,
    ) -> Result<ZoneCacheVariants> {
        #[derive(Serialize)]
        struct UpdateBody<'a> {
            value: &'a ZoneCacheVariantsValues,
        }

        self.patch(&cache_variants_path(zone_id), &UpdateBody { value: values })
            .await
    }

    async fn delete_zone_cache_variants(&self, zone_id: &str) -> Result<()> {
        self.delete(&cache_variants_path(zone_id)).await
    }

    async fn pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<PagesDomain> {
        let path = format!(
            "{}/{}",
            pages_domains_path(account_id, project_name),
            encode(domain)
        );
        self.get(&path).await
    }

    async fn add_pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<PagesDomain> {
        #[derive(Serialize)]
        struct AddDomainBody<'a> {
            name: &'a str,
        }

        self.post(
            &pages_domains_path(account_id, project_name),
            &AddDomainBody { name: domain },
        )
        .await
    }

    async fn delete_pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<()> {
        let path = format!(
            "{}/{}",
            pages_domains_path(account_id, project_name),
            encode(domain)
        );
        self.delete(&path).await
    }
}
