//! Provider configuration block

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tf_cloudflare_api::{ClientOptions, CloudflareClient, Credentials, mask_secret};

use crate::error::{CoreError, CoreResult};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::state;

pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";
pub const ENV_EMAIL: &str = "CLOUDFLARE_EMAIL";
pub const ENV_API_BASE_URL: &str = "CLOUDFLARE_API_BASE_URL";
pub const ENV_RETRIES: &str = "CLOUDFLARE_RETRIES";

/// Settings of the `provider` block.
///
/// Values from the block win over the environment.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &self.api_token.as_deref().map(mask_secret))
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("email", &self.email)
            .field("api_base_url", &self.api_base_url)
            .field("retries", &self.retries)
            .finish()
    }
}

impl ProviderConfig {
    pub fn schema() -> Schema {
        Schema::new()
            .attribute(
                "api_token",
                Attribute::optional_string().sensitive().with_description(&format!(
                    "The API Token for operations. Alternatively, can be configured using the `{ENV_API_TOKEN}` environment variable."
                )),
            )
            .attribute(
                "api_key",
                Attribute::optional_string().sensitive().with_description(&format!(
                    "The API key for operations. Alternatively, can be configured using the `{ENV_API_KEY}` environment variable."
                )),
            )
            .attribute(
                "email",
                Attribute::optional_string().with_description(&format!(
                    "A registered Cloudflare email address. Alternatively, can be configured using the `{ENV_EMAIL}` environment variable."
                )),
            )
            .attribute(
                "api_base_url",
                Attribute::optional_string().with_description(&format!(
                    "Configure the base URL of the Cloudflare API. Alternatively, can be configured using the `{ENV_API_BASE_URL}` environment variable."
                )),
            )
            .attribute(
                "retries",
                Attribute::optional(AttributeType::Int).with_description(&format!(
                    "Maximum number of retries to perform when an API request fails. Alternatively, can be configured using the `{ENV_RETRIES}` environment variable."
                )),
            )
    }

    /// Parse a `provider` block; `null` is an empty block.
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        state::decode("provider", value)
    }

    /// Fill unset values from the process environment.
    pub fn with_env_fallback(self) -> CoreResult<Self> {
        self.with_fallback(|key| std::env::var(key).ok())
    }

    /// Fill unset values from `lookup`.
    ///
    /// The auth method falls back as a whole: if the block names either
    /// `api_token` or `api_key`, neither is taken from the environment.
    pub fn with_fallback<F>(mut self, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.api_token.is_none() && self.api_key.is_none() {
            self.api_token = lookup(ENV_API_TOKEN);
            self.api_key = lookup(ENV_API_KEY);
        }
        if self.email.is_none() {
            self.email = lookup(ENV_EMAIL);
        }
        if self.api_base_url.is_none() {
            self.api_base_url = lookup(ENV_API_BASE_URL);
        }
        if self.retries.is_none()
            && let Some(raw) = lookup(ENV_RETRIES)
        {
            let retries = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_RETRIES} must be a non-negative integer, got '{raw}'"))
            })?;
            self.retries = Some(retries);
        }
        Ok(self)
    }

    pub fn credentials(&self) -> CoreResult<Credentials> {
        Ok(Credentials::from_parts(
            self.api_token.as_deref(),
            self.api_key.as_deref(),
            self.email.as_deref(),
        )?)
    }

    pub fn client_options(&self) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            base_url: self.api_base_url.clone().unwrap_or(defaults.base_url),
            max_retries: self.retries.unwrap_or(defaults.max_retries),
            ..defaults
        }
    }

    /// Validate credentials and build the HTTP client.
    pub fn build_client(&self) -> CoreResult<CloudflareClient> {
        let credentials = self.credentials()?;
        let options = self.client_options();
        log::debug!(
            "Using Cloudflare API at {} with {} retries",
            options.base_url,
            options.max_retries
        );
        CloudflareClient::with_options(credentials, options)
            .map_err(|source| CoreError::Api {
                context: "error creating Cloudflare client".to_string(),
                source,
            })
    }
}
