//! # tf-cloudflare-api
//!
//! A typed client for the parts of the Cloudflare v4 API managed by the
//! `tf-cloudflare` provider.
//!
//! ## Covered Endpoints
//!
//! | Area | Endpoint |
//! |------|----------|
//! | WAF packages | `GET /zones/{zone}/firewall/waf/packages` |
//! | WAF groups | `GET /zones/{zone}/firewall/waf/packages/{package}/groups` |
//! | Cache variants | `GET/PATCH/DELETE /zones/{zone}/cache/variants` |
//! | Pages domains | `GET/POST/DELETE /accounts/{account}/pages/projects/{project}/domains` |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tf_cloudflare_api::{CloudflareApi, CloudflareClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CloudflareClient::new(Credentials::ApiToken {
//!         api_token: "your-token".to_string(),
//!     })?;
//!
//!     for package in client.list_waf_packages("zone-id").await? {
//!         println!("{} ({})", package.name, package.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ApiError>`](ApiError). Absent objects
//! surface as [`ApiError::NotFound`] (check with [`ApiError::is_not_found`]),
//! derived from the HTTP status and Cloudflare's error codes rather than
//! from message text.
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried
//! with exponential backoff, see [`ClientOptions::max_retries`].

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::{ClientOptions, CloudflareClient};
pub use error::{ApiError, Result};
pub use traits::CloudflareApi;
pub use types::{
    CredentialValidationError, Credentials, PagesDomain, WafGroup, WafPackage, ZoneCacheVariants,
    ZoneCacheVariantsValues,
};
pub use utils::log_sanitizer::mask_secret;
