//! Managed resources

mod pages_domain;
mod zone_cache_variants;

pub use pages_domain::{PagesDomainModel, PagesDomainResource};
pub use zone_cache_variants::{ZoneCacheVariantsModel, ZoneCacheVariantsResource};
