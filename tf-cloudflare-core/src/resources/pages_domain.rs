//! `cloudflare_pages_domain` resource

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tf_cloudflare_api::CloudflareApi;

use crate::error::{ApiResultExt, CoreError, CoreResult};
use crate::schema::{Attribute, Schema};
use crate::state::{self, non_empty};
use crate::traits::Resource;

pub const TYPE_NAME: &str = "cloudflare_pages_domain";

const IMPORT_ID_FORMAT: &str = "<account_id>/<project_name>/<domain>";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesDomainModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_id: String,
    pub project_name: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PagesDomainModel {
    fn domain_name(&self) -> Option<&str> {
        non_empty(self.id.as_deref()).or_else(|| non_empty(Some(self.domain.as_str())))
    }
}

pub struct PagesDomainResource {
    api: Arc<dyn CloudflareApi>,
}

impl PagesDomainResource {
    pub fn new(api: Arc<dyn CloudflareApi>) -> Self {
        Self { api }
    }

    async fn refresh(
        &self,
        account_id: &str,
        project_name: &str,
        domain: &str,
    ) -> CoreResult<Option<PagesDomainModel>> {
        match self.api.pages_domain(account_id, project_name, domain).await {
            // Keep the domain as configured, the API may normalize its case
            Ok(found) => Ok(Some(PagesDomainModel {
                id: Some(domain.to_string()),
                account_id: account_id.to_string(),
                project_name: project_name.to_string(),
                domain: domain.to_string(),
                status: Some(found.status),
            })),
            Err(e) if e.is_not_found() => {
                log::info!("Pages domain {domain} of project {project_name} not found, removing from state");
                Ok(None)
            }
            Err(source) => Err(CoreError::Api {
                context: format!("error reading domain \"{domain}\" of Pages project \"{project_name}\""),
                source,
            }),
        }
    }

    async fn refresh_or_vanished(&self, model: &PagesDomainModel) -> CoreResult<Value> {
        match self
            .refresh(&model.account_id, &model.project_name, &model.domain)
            .await?
        {
            Some(refreshed) => state::encode(TYPE_NAME, &refreshed),
            None => Err(CoreError::Vanished {
                type_name: TYPE_NAME.to_string(),
                id: model.domain.clone(),
            }),
        }
    }
}

#[async_trait]
impl Resource for PagesDomainResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_description("Provides a resource for managing Cloudflare Pages domains.")
            .attribute(
                "id",
                Attribute::computed_string().with_description("Same as the custom domain."),
            )
            .attribute(
                "account_id",
                Attribute::required_string()
                    .force_new()
                    .with_description("The account identifier to target for the resource."),
            )
            .attribute(
                "domain",
                Attribute::required_string()
                    .force_new()
                    .with_description("Custom domain."),
            )
            .attribute(
                "project_name",
                Attribute::required_string()
                    .force_new()
                    .with_description("Name of the Pages Project."),
            )
            .attribute(
                "status",
                Attribute::computed_string().with_description("Status of the custom domain."),
            )
    }

    async fn create(&self, config: &Value) -> CoreResult<Value> {
        let model: PagesDomainModel = state::decode(TYPE_NAME, config)?;

        log::info!(
            "Adding domain {} to Pages project {}",
            model.domain,
            model.project_name
        );
        self.api
            .add_pages_domain(&model.account_id, &model.project_name, &model.domain)
            .await
            .context(|| {
                format!(
                    "error adding domain \"{}\" to Pages project \"{}\"",
                    model.domain, model.project_name
                )
            })?;

        self.refresh_or_vanished(&model).await
    }

    async fn read(&self, state: &Value) -> CoreResult<Option<Value>> {
        let model: PagesDomainModel = state::decode(TYPE_NAME, state)?;
        let Some(domain) = model.domain_name() else {
            return Ok(None);
        };
        match self
            .refresh(&model.account_id, &model.project_name, domain)
            .await?
        {
            Some(refreshed) => state::encode(TYPE_NAME, &refreshed).map(Some),
            None => Ok(None),
        }
    }

    /// Every input forces replacement, so an update only refreshes.
    async fn update(&self, config: &Value, _prior: &Value) -> CoreResult<Value> {
        let model: PagesDomainModel = state::decode(TYPE_NAME, config)?;
        self.refresh_or_vanished(&model).await
    }

    async fn delete(&self, state: &Value) -> CoreResult<()> {
        let model: PagesDomainModel = state::decode(TYPE_NAME, state)?;
        let Some(domain) = model.domain_name() else {
            return Ok(());
        };

        log::info!(
            "Deleting domain {domain} from Pages project {}",
            model.project_name
        );
        match self
            .api
            .delete_pages_domain(&model.account_id, &model.project_name, domain)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                log::info!("Pages domain {domain} already absent");
                Ok(())
            }
            Err(source) => Err(CoreError::Api {
                context: format!(
                    "error deleting domain \"{domain}\" from Pages project \"{}\"",
                    model.project_name
                ),
                source,
            }),
        }
    }

    async fn import(&self, id: &str) -> CoreResult<Option<Value>> {
        let parts: Vec<&str> = id.split('/').collect();
        let [account_id, project_name, domain] = parts.as_slice() else {
            return Err(CoreError::InvalidImportId {
                id: id.to_string(),
                expected: IMPORT_ID_FORMAT.to_string(),
            });
        };
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(CoreError::InvalidImportId {
                id: id.to_string(),
                expected: IMPORT_ID_FORMAT.to_string(),
            });
        }

        match self.refresh(account_id, project_name, domain).await? {
            Some(model) => state::encode(TYPE_NAME, &model).map(Some),
            None => Ok(None),
        }
    }
}
