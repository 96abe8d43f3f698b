//! `cloudflare_waf_groups` data source

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tf_cloudflare_api::{CloudflareApi, WafGroup};

use crate::checksum::string_list_checksum;
use crate::error::{ApiResultExt, CoreResult};
use crate::filter::{WafGroupFilter, compile_pattern};
use crate::schema::{Attribute, Schema, Validator};
use crate::state::{self, non_empty};
use crate::traits::DataSource;

pub const TYPE_NAME: &str = "cloudflare_waf_groups";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WafGroupsFilterBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WafGroupsConfig {
    pub zone_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<Option<WafGroupsFilterBlock>>>,
}

impl WafGroupsConfig {
    /// Compile the filter block; a bad pattern fails here, before any request.
    pub fn build_filter(&self) -> CoreResult<WafGroupFilter> {
        let Some(block) = self.filter.iter().flatten().flatten().next() else {
            return Ok(WafGroupFilter::default());
        };
        Ok(WafGroupFilter {
            name: compile_pattern("filter.0.name", block.name.as_deref())?,
            mode: block.mode.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct WafGroupsState<'a> {
    id: String,
    #[serde(flatten)]
    config: &'a WafGroupsConfig,
    groups: Vec<WafGroup>,
}

pub struct WafGroupsDataSource {
    api: Arc<dyn CloudflareApi>,
}

impl WafGroupsDataSource {
    pub fn new(api: Arc<dyn CloudflareApi>) -> Self {
        Self { api }
    }

    /// Explicit package, or every package of the zone.
    async fn package_ids(&self, config: &WafGroupsConfig) -> CoreResult<Vec<String>> {
        if let Some(package_id) = non_empty(config.package_id.as_deref()) {
            return Ok(vec![package_id.to_string()]);
        }

        let zone_id = config.zone_id.as_str();
        log::debug!("Reading WAF packages of zone {zone_id}");
        let packages = self
            .api
            .list_waf_packages(zone_id)
            .await
            .context(|| format!("error listing WAF packages for zone \"{zone_id}\""))?;
        Ok(packages.into_iter().map(|p| p.id).collect())
    }
}

fn group_schema() -> Schema {
    Schema::new()
        .attribute("id", Attribute::computed_string())
        .attribute("name", Attribute::computed_string())
        .attribute("description", Attribute::computed_string())
        .attribute("mode", Attribute::computed_string())
        .attribute("rules_count", Attribute::computed_int())
        .attribute("modified_rules_count", Attribute::computed_int())
        .attribute("package_id", Attribute::computed_string())
}

#[async_trait]
impl DataSource for WafGroupsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_description("Use this data source to look up WAF Rule Groups.")
            .attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Checksum of the matched group identifiers."),
            )
            .attribute(
                "zone_id",
                Attribute::required_string()
                    .with_description("The zone identifier to target for the resource."),
            )
            .attribute(
                "package_id",
                Attribute::optional_string().with_description(
                    "The ID of the WAF Rule Package in which to search for the WAF Rule Groups.",
                ),
            )
            .attribute(
                "filter",
                Attribute::block(
                    Schema::new()
                        .attribute(
                            "name",
                            Attribute::optional_string().with_description(
                                "A regular expression matching the name of the WAF Rule Groups to lookup.",
                            ),
                        )
                        .attribute(
                            "mode",
                            Attribute::optional_string()
                                .with_validator(Validator::one_of(&["on", "off"]))
                                .with_description("Mode of the WAF Rule Groups to lookup."),
                        ),
                )
                .max_items(1),
            )
            .attribute("groups", Attribute::computed_block(group_schema()))
    }

    async fn read(&self, config: &Value) -> CoreResult<Value> {
        let config: WafGroupsConfig = state::decode(TYPE_NAME, config)?;
        let filter = config.build_filter()?;
        let zone_id = config.zone_id.as_str();

        let package_ids = self.package_ids(&config).await?;

        log::debug!("Reading WAF groups of {} package(s)", package_ids.len());
        let mut groups = Vec::new();
        for package_id in &package_ids {
            let listed = self
                .api
                .list_waf_groups(zone_id, package_id)
                .await
                .context(|| {
                    format!("error listing WAF groups of package \"{package_id}\" in zone \"{zone_id}\"")
                })?;

            groups.extend(
                listed
                    .into_iter()
                    .filter(|group| filter.matches(group))
                    .map(|group| WafGroup {
                        package_id: package_id.clone(),
                        ..group
                    }),
            );
        }

        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        let id = string_list_checksum(&ids);
        log::debug!("Matched {} WAF group(s) in zone {zone_id}", groups.len());

        state::encode(
            TYPE_NAME,
            &WafGroupsState {
                id,
                config: &config,
                groups,
            },
        )
    }
}
