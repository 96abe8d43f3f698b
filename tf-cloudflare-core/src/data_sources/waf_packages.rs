//! `cloudflare_waf_packages` data source

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tf_cloudflare_api::{CloudflareApi, WafPackage};

use crate::checksum::string_list_checksum;
use crate::error::{ApiResultExt, CoreResult};
use crate::filter::{WafPackageFilter, compile_pattern};
use crate::schema::{Attribute, Schema, Validator};
use crate::state;
use crate::traits::DataSource;

pub const TYPE_NAME: &str = "cloudflare_waf_packages";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WafPackagesFilterBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WafPackagesConfig {
    pub zone_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<Option<WafPackagesFilterBlock>>>,
}

impl WafPackagesConfig {
    pub fn build_filter(&self) -> CoreResult<WafPackageFilter> {
        let Some(block) = self.filter.iter().flatten().flatten().next() else {
            return Ok(WafPackageFilter::default());
        };
        Ok(WafPackageFilter {
            name: compile_pattern("filter.0.name", block.name.as_deref())?,
            detection_mode: block.detection_mode.clone(),
            sensitivity: block.sensitivity.clone(),
            action_mode: block.action_mode.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct WafPackagesState<'a> {
    id: String,
    #[serde(flatten)]
    config: &'a WafPackagesConfig,
    packages: Vec<WafPackage>,
}

pub struct WafPackagesDataSource {
    api: Arc<dyn CloudflareApi>,
}

impl WafPackagesDataSource {
    pub fn new(api: Arc<dyn CloudflareApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for WafPackagesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let filter = Schema::new()
            .attribute(
                "name",
                Attribute::optional_string().with_description(
                    "A regular expression matching the name of the WAF Rule Packages to lookup.",
                ),
            )
            .attribute(
                "detection_mode",
                Attribute::optional_string()
                    .with_description("Detection mode of the WAF Rule Packages to lookup."),
            )
            .attribute(
                "sensitivity",
                Attribute::optional_string()
                    .with_validator(Validator::one_of(&["high", "medium", "low", "off"]))
                    .with_description("Sensitivity of the WAF Rule Packages to lookup."),
            )
            .attribute(
                "action_mode",
                Attribute::optional_string()
                    .with_validator(Validator::one_of(&["simulate", "block", "challenge"]))
                    .with_description("Action mode of the WAF Rule Packages to lookup."),
            );

        let package = Schema::new()
            .attribute("id", Attribute::computed_string())
            .attribute("name", Attribute::computed_string())
            .attribute("description", Attribute::computed_string())
            .attribute("detection_mode", Attribute::computed_string())
            .attribute("sensitivity", Attribute::computed_string())
            .attribute("action_mode", Attribute::computed_string());

        Schema::new()
            .with_description("Use this data source to look up WAF Rule Packages.")
            .attribute("id", Attribute::computed_string())
            .attribute(
                "zone_id",
                Attribute::required_string()
                    .with_description("The zone identifier to target for the resource."),
            )
            .attribute("filter", Attribute::block(filter).max_items(1))
            .attribute("packages", Attribute::computed_block(package))
    }

    async fn read(&self, config: &Value) -> CoreResult<Value> {
        let config: WafPackagesConfig = state::decode(TYPE_NAME, config)?;
        let filter = config.build_filter()?;
        let zone_id = config.zone_id.as_str();

        log::debug!("Reading WAF packages of zone {zone_id}");
        let packages: Vec<WafPackage> = self
            .api
            .list_waf_packages(zone_id)
            .await
            .context(|| format!("error listing WAF packages for zone \"{zone_id}\""))?
            .into_iter()
            .filter(|package| filter.matches(package))
            .collect();

        let ids: Vec<&str> = packages.iter().map(|p| p.id.as_str()).collect();
        let id = string_list_checksum(&ids);

        state::encode(
            TYPE_NAME,
            &WafPackagesState {
                id,
                config: &config,
                packages,
            },
        )
    }
}
