//! Test helpers
//!
//! An in-memory `CloudflareApi` that records every call.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tf_cloudflare_api::{
    ApiError, CloudflareApi, PagesDomain, Result, WafGroup, WafPackage, ZoneCacheVariants,
    ZoneCacheVariantsValues,
};

type DomainKey = (String, String, String);

fn not_found(resource: String) -> ApiError {
    ApiError::NotFound {
        resource,
        raw_message: None,
    }
}

// ===== MockCloudflareApi =====

pub struct MockCloudflareApi {
    packages: RwLock<HashMap<String, Vec<WafPackage>>>,
    groups: RwLock<HashMap<(String, String), Vec<WafGroup>>>,
    cache_variants: RwLock<HashMap<String, ZoneCacheVariantsValues>>,
    pages_domains: RwLock<HashMap<DomainKey, PagesDomain>>,
    /// If Some, every call returns this error
    failure: RwLock<Option<ApiError>>,
    calls: RwLock<Vec<String>>,
}

impl MockCloudflareApi {
    pub fn new() -> Self {
        Self {
            packages: RwLock::new(HashMap::new()),
            groups: RwLock::new(HashMap::new()),
            cache_variants: RwLock::new(HashMap::new()),
            pages_domains: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            calls: RwLock::new(Vec::new()),
        }
    }

    pub async fn fail_with(&self, err: ApiError) {
        *self.failure.write().await = Some(err);
    }

    /// Calls made so far, as `"method arg1 arg2"`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn put_packages(&self, zone_id: &str, packages: Vec<WafPackage>) {
        self.packages
            .write()
            .await
            .insert(zone_id.to_string(), packages);
    }

    pub async fn put_groups(&self, zone_id: &str, package_id: &str, groups: Vec<WafGroup>) {
        self.groups
            .write()
            .await
            .insert((zone_id.to_string(), package_id.to_string()), groups);
    }

    pub async fn put_cache_variants(&self, zone_id: &str, values: ZoneCacheVariantsValues) {
        self.cache_variants
            .write()
            .await
            .insert(zone_id.to_string(), values);
    }

    pub async fn put_pages_domain(&self, account_id: &str, project_name: &str, domain: PagesDomain) {
        self.pages_domains
            .write()
            .await
            .insert(domain_key(account_id, project_name, &domain.name), domain);
    }

    async fn record(&self, call: String) -> Result<()> {
        self.calls.write().await.push(call);
        match &*self.failure.read().await {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// Domain names are matched case-insensitively, as by Cloudflare
fn domain_key(account_id: &str, project_name: &str, domain: &str) -> DomainKey {
    (
        account_id.to_string(),
        project_name.to_string(),
        domain.to_ascii_lowercase(),
    )
}

#[async_trait]
impl CloudflareApi for MockCloudflareApi {
    async fn verify_token(&self) -> Result<bool> {
        self.record("verify_token".to_string()).await?;
        Ok(true)
    }

    async fn list_waf_packages(&self, zone_id: &str) -> Result<Vec<WafPackage>> {
        self.record(format!("list_waf_packages {zone_id}")).await?;
        Ok(self
            .packages
            .read()
            .await
            .get(zone_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_waf_groups(&self, zone_id: &str, package_id: &str) -> Result<Vec<WafGroup>> {
        self.record(format!("list_waf_groups {zone_id} {package_id}"))
            .await?;
        self.groups
            .read()
            .await
            .get(&(zone_id.to_string(), package_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(format!("waf package {package_id}")))
    }

    async fn zone_cache_variants(&self, zone_id: &str) -> Result<ZoneCacheVariants> {
        self.record(format!("zone_cache_variants {zone_id}")).await?;
        self.cache_variants
            .read()
            .await
            .get(zone_id)
            .map(|value| ZoneCacheVariants {
                id: "variants".to_string(),
                value: value.clone(),
                editable: true,
                modified_on: None,
            })
            .ok_or_else(|| not_found(format!("cache variants of {zone_id}")))
    }

    async fn update_zone_cache_variants(
        &self,
        zone_id: &str,
        values: &ZoneCacheVariantsValues,
    ) -> Result<ZoneCacheVariants> {
        self.record(format!("update_zone_cache_variants {zone_id}"))
            .await?;
        self.cache_variants
            .write()
            .await
            .insert(zone_id.to_string(), values.clone());
        Ok(ZoneCacheVariants {
            id: "variants".to_string(),
            value: values.clone(),
            editable: true,
            modified_on: None,
        })
    }

    async fn delete_zone_cache_variants(&self, zone_id: &str) -> Result<()> {
        self.record(format!("delete_zone_cache_variants {zone_id}"))
            .await?;
        self.cache_variants
            .write()
            .await
            .remove(zone_id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("cache variants of {zone_id}")))
    }

    async fn pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<PagesDomain> {
        self.record(format!("pages_domain {account_id} {project_name} {domain}"))
            .await?;
        self.pages_domains
            .read()
            .await
            .get(&domain_key(account_id, project_name, domain))
            .cloned()
            .ok_or_else(|| not_found(format!("domain {domain}")))
    }

    async fn add_pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<PagesDomain> {
        self.record(format!(
            "add_pages_domain {account_id} {project_name} {domain}"
        ))
        .await?;
        let added = PagesDomain {
            id: format!("dom-{domain}"),
            name: domain.to_ascii_lowercase(),
            status: "initializing".to_string(),
            zone_tag: None,
            created_on: None,
        };
        self.pages_domains
            .write()
            .await
            .insert(domain_key(account_id, project_name, domain), added.clone());
        Ok(added)
    }

    async fn delete_pages_domain(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> Result<()> {
        self.record(format!(
            "delete_pages_domain {account_id} {project_name} {domain}"
        ))
        .await?;
        self.pages_domains
            .write()
            .await
            .remove(&domain_key(account_id, project_name, domain))
            .map(|_| ())
            .ok_or_else(|| not_found(format!("domain {domain}")))
    }
}
