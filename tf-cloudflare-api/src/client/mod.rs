//! Cloudflare v4 REST client

mod api;
mod error;
mod http;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::error::{ApiError, Result};
use crate::types::Credentials;

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Page size used when walking list endpoints
pub(crate) const PER_PAGE: u32 = 100;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tunables for [`CloudflareClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root, without trailing slash (e.g. `https://api.cloudflare.com/client/v4`).
    pub base_url: String,
    /// How many times a transient failure is retried.
    pub max_retries: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: CF_API_BASE.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: concat!("tf-cloudflare/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Cloudflare API client
pub struct CloudflareClient {
    pub(crate) client: Client,
    pub(crate) credentials: Credentials,
    pub(crate) base_url: String,
    pub(crate) max_retries: u32,
}

impl CloudflareClient {
    /// Client against the public API with default options.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_options(credentials, ClientOptions::default())
    }

    pub fn with_options(credentials: Credentials, options: ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| ApiError::NetworkError {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            credentials,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            max_retries: options.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the auth headers matching the configured credentials.
    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::ApiToken { api_token } => builder.bearer_auth(api_token),
            Credentials::ApiKey { email, api_key } => builder
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", api_key),
        }
    }
}
