//! Provider registry and callback dispatch
//!
//! Every dispatch method returns a [`Response`] instead of a `Result`:
//! failures become error diagnostics, logged at `warn` when expected
//! (bad input, missing objects) and at `error` otherwise.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tf_cloudflare_api::CloudflareApi;

use crate::config::ProviderConfig;
use crate::data_sources::{WafGroupsDataSource, WafPackagesDataSource};
use crate::diagnostics::{Diagnostic, has_errors};
use crate::error::{ApiResultExt, CoreError, CoreResult};
use crate::resources::{PagesDomainResource, ZoneCacheVariantsResource};
use crate::schema::Schema;
use crate::traits::{DataSource, Resource};
use crate::unconfigured::UnconfiguredApi;

/// Outcome of one callback.
///
/// `state: None` means the object does not exist (after a delete, or when
/// a read found it gone).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub state: Option<Value>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn ok(state: Option<Value>) -> Self {
        Self {
            state,
            diagnostics: Vec::new(),
        }
    }

    fn invalid(state: Option<Value>, diagnostics: Vec<Diagnostic>) -> Self {
        Self { state, diagnostics }
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

/// Every schema the provider exposes.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

pub struct Provider {
    api: Arc<dyn CloudflareApi>,
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource>>,
}

impl Provider {
    /// Register every resource and data source against one API handle.
    pub fn new(api: Arc<dyn CloudflareApi>) -> Self {
        let resources: Vec<Box<dyn Resource>> = vec![
            Box::new(PagesDomainResource::new(api.clone())),
            Box::new(ZoneCacheVariantsResource::new(api.clone())),
        ];
        let data_sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(WafGroupsDataSource::new(api.clone())),
            Box::new(WafPackagesDataSource::new(api.clone())),
        ];

        Self {
            api,
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    /// Provider without credentials, for listing schemas and validating
    /// configuration. Callbacks that reach the API fail.
    pub fn unconfigured() -> Self {
        Self::new(Arc::new(UnconfiguredApi))
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: ProviderConfig::schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, r)| ((*name).to_string(), r.schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, d)| ((*name).to_string(), d.schema()))
                .collect(),
        }
    }

    pub fn resource(&self, type_name: &str) -> CoreResult<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(|boxed| &**boxed)
            .ok_or_else(|| CoreError::UnknownResource(type_name.to_string()))
    }

    pub fn data_source(&self, type_name: &str) -> CoreResult<&dyn DataSource> {
        self.data_sources
            .get(type_name)
            .map(|boxed| &**boxed)
            .ok_or_else(|| CoreError::UnknownDataSource(type_name.to_string()))
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    /// Check that the configured credentials are accepted by the API.
    pub async fn verify_credentials(&self) -> CoreResult<bool> {
        self.api
            .verify_token()
            .await
            .context(|| "error verifying Cloudflare credentials")
    }

    // ===== Validation =====

    pub fn validate_resource_config(&self, type_name: &str, config: &Value) -> Vec<Diagnostic> {
        match self.resource(type_name) {
            Ok(resource) => resource.schema().validate(config),
            Err(e) => vec![Diagnostic::from(&e)],
        }
    }

    pub fn validate_data_source_config(&self, type_name: &str, config: &Value) -> Vec<Diagnostic> {
        match self.data_source(type_name) {
            Ok(data_source) => data_source.schema().validate(config),
            Err(e) => vec![Diagnostic::from(&e)],
        }
    }

    // ===== Resource callbacks =====

    pub async fn create(&self, type_name: &str, config: &Value) -> Response {
        let resource = match self.resource(type_name) {
            Ok(r) => r,
            Err(e) => return fail(type_name, "create", None, &e),
        };
        let diagnostics = resource.schema().validate(config);
        if has_errors(&diagnostics) {
            return Response::invalid(None, diagnostics);
        }

        match resource.create(config).await {
            Ok(state) => Response::ok(Some(state)),
            Err(e) => fail(type_name, "create", None, &e),
        }
    }

    pub async fn read(&self, type_name: &str, state: &Value) -> Response {
        let prior = Some(state.clone());
        let resource = match self.resource(type_name) {
            Ok(r) => r,
            Err(e) => return fail(type_name, "read", prior, &e),
        };

        match resource.read(state).await {
            Ok(Some(refreshed)) => Response::ok(Some(refreshed)),
            Ok(None) => {
                log::info!("{type_name} no longer exists, clearing state");
                Response::ok(None)
            }
            Err(e) => fail(type_name, "read", prior, &e),
        }
    }

    pub async fn update(&self, type_name: &str, config: &Value, prior: &Value) -> Response {
        let kept = Some(prior.clone());
        let resource = match self.resource(type_name) {
            Ok(r) => r,
            Err(e) => return fail(type_name, "update", kept, &e),
        };

        let schema = resource.schema();
        let mut diagnostics = schema.validate(config);
        diagnostics.extend(replacement_diagnostics(&schema, config, prior));
        if has_errors(&diagnostics) {
            return Response::invalid(kept, diagnostics);
        }

        match resource.update(config, prior).await {
            Ok(state) => Response::ok(Some(state)),
            Err(e) => fail(type_name, "update", kept, &e),
        }
    }

    pub async fn delete(&self, type_name: &str, state: &Value) -> Response {
        let prior = Some(state.clone());
        let resource = match self.resource(type_name) {
            Ok(r) => r,
            Err(e) => return fail(type_name, "delete", prior, &e),
        };

        match resource.delete(state).await {
            Ok(()) => Response::ok(None),
            Err(e) => fail(type_name, "delete", prior, &e),
        }
    }

    pub async fn import(&self, type_name: &str, id: &str) -> Response {
        let resource = match self.resource(type_name) {
            Ok(r) => r,
            Err(e) => return fail(type_name, "import", None, &e),
        };

        match resource.import(id).await {
            Ok(Some(state)) => Response::ok(Some(state)),
            Ok(None) => Response::invalid(
                None,
                vec![Diagnostic::error(format!(
                    "Cannot import non-existent remote object {type_name} '{id}'"
                ))],
            ),
            Err(e) => fail(type_name, "import", None, &e),
        }
    }

    // ===== Data source callbacks =====

    pub async fn read_data_source(&self, type_name: &str, config: &Value) -> Response {
        let data_source = match self.data_source(type_name) {
            Ok(d) => d,
            Err(e) => return fail(type_name, "read", None, &e),
        };
        let diagnostics = data_source.schema().validate(config);
        if has_errors(&diagnostics) {
            return Response::invalid(None, diagnostics);
        }

        match data_source.read(config).await {
            Ok(state) => Response::ok(Some(state)),
            Err(e) => fail(type_name, "read", None, &e),
        }
    }
}

/// Force-new attributes whose configured value differs from the prior state.
fn replacement_diagnostics(schema: &Schema, config: &Value, prior: &Value) -> Vec<Diagnostic> {
    schema
        .force_new_attributes()
        .filter_map(|name| {
            let before = prior.get(name).filter(|v| !v.is_null())?;
            let after = config.get(name).unwrap_or(&Value::Null);
            (before != after).then(|| {
                Diagnostic::error(format!("Changing \"{name}\" requires replacement"))
                    .with_detail(format!("{before} -> {after}"))
                    .at(name)
            })
        })
        .collect()
}

fn fail(type_name: &str, operation: &str, state: Option<Value>, err: &CoreError) -> Response {
    if err.is_expected() {
        log::warn!("{operation} {type_name} failed: {err}");
    } else {
        log::error!("{operation} {type_name} failed: {err}");
    }
    Response::invalid(state, vec![Diagnostic::from(err)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockCloudflareApi;
    use serde_json::json;
    use tf_cloudflare_api::{ApiError, WafGroup, WafPackage, ZoneCacheVariantsValues};

    const ZONE: &str = "z1";

    fn setup() -> (Arc<MockCloudflareApi>, Provider) {
        let api = Arc::new(MockCloudflareApi::new());
        let provider = Provider::new(api.clone());
        (api, provider)
    }

    #[test]
    fn registers_every_type() {
        let (_, provider) = setup();
        assert_eq!(
            provider.resource_names().collect::<Vec<_>>(),
            ["cloudflare_pages_domain", "cloudflare_zone_cache_variants"]
        );
        assert_eq!(
            provider.data_source_names().collect::<Vec<_>>(),
            ["cloudflare_waf_groups", "cloudflare_waf_packages"]
        );

        let schema = serde_json::to_value(provider.schema()).unwrap();
        assert!(schema["provider"]["attributes"]["api_token"]["sensitive"]
            .as_bool()
            .unwrap());
        assert!(schema["resources"]["cloudflare_zone_cache_variants"].is_object());
        assert!(schema["data_sources"]["cloudflare_waf_groups"].is_object());
    }

    #[test]
    fn unknown_type_is_diagnostic() {
        let (_, provider) = setup();
        let diags = provider.validate_resource_config("cloudflare_nope", &json!({}));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("cloudflare_nope"));
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_api() {
        let (api, provider) = setup();
        let response = provider
            .read_data_source(
                "cloudflare_waf_groups",
                &json!({ "zone_id": ZONE, "filter": [{ "mode": "sometimes" }] }),
            )
            .await;

        assert!(response.has_errors());
        assert!(response.state.is_none());
        assert_eq!(
            response.diagnostics[0].attribute.as_deref(),
            Some("filter.0.mode")
        );
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_pattern_reported_on_name() {
        let (api, provider) = setup();
        let response = provider
            .read_data_source(
                "cloudflare_waf_groups",
                &json!({ "zone_id": ZONE, "filter": [{ "name": "[a-" }] }),
            )
            .await;

        assert_eq!(
            response.diagnostics[0].attribute.as_deref(),
            Some("filter.0.name")
        );
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn data_source_read_round() {
        let (api, provider) = setup();
        api.put_packages(
            ZONE,
            vec![WafPackage {
                id: "p1".to_string(),
                ..Default::default()
            }],
        )
        .await;
        api.put_groups(
            ZONE,
            "p1",
            vec![WafGroup {
                id: "g1".to_string(),
                name: "bot-detect".to_string(),
                mode: "on".to_string(),
                ..Default::default()
            }],
        )
        .await;

        let response = provider
            .read_data_source("cloudflare_waf_groups", &json!({ "zone_id": ZONE }))
            .await;
        assert!(response.diagnostics.is_empty());
        assert_eq!(response.state.unwrap()["groups"][0]["id"], "g1");
    }

    #[tokio::test]
    async fn delete_absent_clears_state() {
        let (_, provider) = setup();
        let response = provider
            .delete(
                "cloudflare_zone_cache_variants",
                &json!({ "id": ZONE, "zone_id": ZONE }),
            )
            .await;
        assert_eq!(response, Response::default());
    }

    #[tokio::test]
    async fn failed_read_keeps_prior_state() {
        let (api, provider) = setup();
        api.fail_with(ApiError::Timeout {
            detail: "30s".to_string(),
        })
        .await;

        let state = json!({ "id": ZONE, "zone_id": ZONE });
        let response = provider.read("cloudflare_zone_cache_variants", &state).await;
        assert!(response.has_errors());
        assert_eq!(response.state, Some(state));
    }

    #[tokio::test]
    async fn update_rejects_force_new_change() {
        let (api, provider) = setup();
        api.put_cache_variants(ZONE, ZoneCacheVariantsValues::default())
            .await;

        let response = provider
            .update(
                "cloudflare_zone_cache_variants",
                &json!({ "zone_id": "other" }),
                &json!({ "id": ZONE, "zone_id": ZONE }),
            )
            .await;

        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].attribute.as_deref(), Some("zone_id"));
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn create_then_read() {
        let (_, provider) = setup();
        let created = provider
            .create(
                "cloudflare_zone_cache_variants",
                &json!({ "zone_id": ZONE, "webp": ["image/webp"] }),
            )
            .await;
        let state = created.state.unwrap();
        assert_eq!(state["id"], ZONE);

        let read = provider.read("cloudflare_zone_cache_variants", &state).await;
        assert_eq!(read.state, Some(state));
    }

    #[tokio::test]
    async fn update_after_case_normalized_create_needs_no_replacement() {
        let (_, provider) = setup();
        let config = json!({ "account_id": "acc", "project_name": "site", "domain": "Example.com" });

        let created = provider.create("cloudflare_pages_domain", &config).await;
        let state = created.state.unwrap();

        let updated = provider
            .update("cloudflare_pages_domain", &config, &state)
            .await;
        assert!(!updated.has_errors(), "{:?}", updated.diagnostics);
        assert_eq!(updated.state.unwrap()["domain"], "Example.com");
    }

    #[tokio::test]
    async fn import_missing_object_is_error() {
        let (_, provider) = setup();
        let response = provider
            .import("cloudflare_pages_domain", "acc/site/example.com")
            .await;
        assert!(response.has_errors());
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn verify_credentials_uses_api() {
        let (api, provider) = setup();
        assert!(provider.verify_credentials().await.unwrap());
        assert_eq!(api.calls().await, ["verify_token"]);
    }
}
