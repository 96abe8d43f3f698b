//! `cloudflare_zone_cache_variants` resource

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tf_cloudflare_api::{CloudflareApi, ZoneCacheVariantsValues};

use crate::error::{ApiResultExt, CoreError, CoreResult};
use crate::schema::{Attribute, Schema};
use crate::state::{self, non_empty};
use crate::traits::Resource;

pub const TYPE_NAME: &str = "cloudflare_zone_cache_variants";

/// File extensions that accept a variants list.
const EXTENSIONS: [&str; 11] = [
    "avif", "bmp", "gif", "jpeg", "jpg", "jp2", "jpg2", "png", "tif", "tiff", "webp",
];

/// Typed state of the resource. The ID equals the zone ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCacheVariantsModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub zone_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avif: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmp: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gif: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpeg: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpg: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jp2: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpg2: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tif: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiff: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webp: Option<BTreeSet<String>>,
}

// Empty sets are treated like absent ones in both directions.
fn to_list(set: Option<&BTreeSet<String>>) -> Option<Vec<String>> {
    set.filter(|s| !s.is_empty())
        .map(|s| s.iter().cloned().collect())
}

fn to_set(list: Option<&Vec<String>>) -> Option<BTreeSet<String>> {
    list.filter(|l| !l.is_empty())
        .map(|l| l.iter().cloned().collect())
}

impl ZoneCacheVariantsModel {
    /// Request payload holding only the configured extensions.
    pub fn values(&self) -> ZoneCacheVariantsValues {
        ZoneCacheVariantsValues {
            avif: to_list(self.avif.as_ref()),
            bmp: to_list(self.bmp.as_ref()),
            gif: to_list(self.gif.as_ref()),
            jpeg: to_list(self.jpeg.as_ref()),
            jpg: to_list(self.jpg.as_ref()),
            jp2: to_list(self.jp2.as_ref()),
            jpg2: to_list(self.jpg2.as_ref()),
            png: to_list(self.png.as_ref()),
            tif: to_list(self.tif.as_ref()),
            tiff: to_list(self.tiff.as_ref()),
            webp: to_list(self.webp.as_ref()),
        }
    }

    pub fn from_values(zone_id: &str, values: &ZoneCacheVariantsValues) -> Self {
        Self {
            id: Some(zone_id.to_string()),
            zone_id: zone_id.to_string(),
            avif: to_set(values.avif.as_ref()),
            bmp: to_set(values.bmp.as_ref()),
            gif: to_set(values.gif.as_ref()),
            jpeg: to_set(values.jpeg.as_ref()),
            jpg: to_set(values.jpg.as_ref()),
            jp2: to_set(values.jp2.as_ref()),
            jpg2: to_set(values.jpg2.as_ref()),
            png: to_set(values.png.as_ref()),
            tif: to_set(values.tif.as_ref()),
            tiff: to_set(values.tiff.as_ref()),
            webp: to_set(values.webp.as_ref()),
        }
    }

    /// Resource ID, falling back to the zone ID for state written without one.
    fn resource_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref()).or_else(|| non_empty(Some(self.zone_id.as_str())))
    }
}

pub struct ZoneCacheVariantsResource {
    api: Arc<dyn CloudflareApi>,
}

impl ZoneCacheVariantsResource {
    pub fn new(api: Arc<dyn CloudflareApi>) -> Self {
        Self { api }
    }

    /// Create and update share one code path: send the configured variants, then re-read.
    async fn apply(&self, config: &Value) -> CoreResult<Value> {
        let model: ZoneCacheVariantsModel = state::decode(TYPE_NAME, config)?;
        let zone_id = model.zone_id.as_str();
        let values = model.values();

        log::info!("Setting zone cache variants for zone {zone_id}: {values:?}");
        self.api
            .update_zone_cache_variants(zone_id, &values)
            .await
            .context(|| format!("error setting cache variants for zone \"{zone_id}\""))?;

        match self.refresh(zone_id).await? {
            Some(refreshed) => state::encode(TYPE_NAME, &refreshed),
            None => Err(CoreError::Vanished {
                type_name: TYPE_NAME.to_string(),
                id: zone_id.to_string(),
            }),
        }
    }

    async fn refresh(&self, zone_id: &str) -> CoreResult<Option<ZoneCacheVariantsModel>> {
        log::info!("Reading zone cache variants in zone {zone_id}");
        match self.api.zone_cache_variants(zone_id).await {
            Ok(variants) => Ok(Some(ZoneCacheVariantsModel::from_values(
                zone_id,
                &variants.value,
            ))),
            Err(e) if e.is_not_found() => {
                log::info!("Zone cache variants for zone {zone_id} not found, removing from state");
                Ok(None)
            }
            Err(source) => Err(CoreError::Api {
                context: format!("error reading cache variants for zone \"{zone_id}\""),
                source,
            }),
        }
    }
}

#[async_trait]
impl Resource for ZoneCacheVariantsResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let schema = Schema::new()
            .with_description(
                "Provides a resource which customizes Cloudflare zone cache variants.",
            )
            .attribute(
                "id",
                Attribute::computed_string().with_description("Same as the zone identifier."),
            )
            .attribute(
                "zone_id",
                Attribute::required_string()
                    .force_new()
                    .with_description("The zone identifier to target for the resource."),
            );

        EXTENSIONS.iter().fold(schema, |schema, ext| {
            schema.attribute(
                ext,
                Attribute::optional_string_set().with_description(&format!(
                    "List of strings with the MIME types of all the variants that should be served for {ext}."
                )),
            )
        })
    }

    async fn create(&self, config: &Value) -> CoreResult<Value> {
        self.apply(config).await
    }

    async fn read(&self, state: &Value) -> CoreResult<Option<Value>> {
        let model: ZoneCacheVariantsModel = state::decode(TYPE_NAME, state)?;
        let Some(zone_id) = model.resource_id() else {
            return Ok(None);
        };
        match self.refresh(zone_id).await? {
            Some(refreshed) => state::encode(TYPE_NAME, &refreshed).map(Some),
            None => Ok(None),
        }
    }

    async fn update(&self, config: &Value, _prior: &Value) -> CoreResult<Value> {
        self.apply(config).await
    }

    async fn delete(&self, state: &Value) -> CoreResult<()> {
        let model: ZoneCacheVariantsModel = state::decode(TYPE_NAME, state)?;
        let Some(zone_id) = model.resource_id() else {
            return Ok(());
        };

        log::info!("Deleting zone cache variants for zone {zone_id}");
        match self.api.delete_zone_cache_variants(zone_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                log::info!("Zone cache variants for zone {zone_id} already absent");
                Ok(())
            }
            Err(source) => Err(CoreError::Api {
                context: format!("error deleting cache variants for zone \"{zone_id}\""),
                source,
            }),
        }
    }

    async fn import(&self, id: &str) -> CoreResult<Option<Value>> {
        let Some(zone_id) = non_empty(Some(id)) else {
            return Err(CoreError::InvalidImportId {
                id: id.to_string(),
                expected: "<zone_id>".to_string(),
            });
        };
        match self.refresh(zone_id).await? {
            Some(model) => state::encode(TYPE_NAME, &model).map(Some),
            None => Ok(None),
        }
    }
}
