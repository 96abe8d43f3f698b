//! Cloudflare Provider Core Library
//!
//! Maps declarative configuration onto the Cloudflare API:
//! - Attribute schemas with configuration validation
//! - Resources (`cloudflare_zone_cache_variants`, `cloudflare_pages_domain`)
//! - Data sources (`cloudflare_waf_groups`, `cloudflare_waf_packages`)
//! - A [`Provider`] registry that dispatches callbacks by type name
//!
//! The API is reached through the [`CloudflareApi`] trait, so callbacks can
//! run against the HTTP client or any other implementation.

pub mod checksum;
pub mod config;
pub mod data_sources;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod provider;
pub mod resources;
pub mod schema;
mod state;
pub mod traits;
mod unconfigured;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use checksum::string_list_checksum;
pub use config::ProviderConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use error::{CoreError, CoreResult};
pub use provider::{Provider, ProviderSchema, Response};
pub use schema::{Attribute, AttributeType, Schema, Validator};
pub use tf_cloudflare_api::CloudflareApi;
pub use traits::{DataSource, Resource};
