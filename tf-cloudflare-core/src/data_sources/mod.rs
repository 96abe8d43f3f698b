//! Read-only data sources

mod waf_groups;
mod waf_packages;

pub use waf_groups::{WafGroupsConfig, WafGroupsDataSource, WafGroupsFilterBlock};
pub use waf_packages::{WafPackagesConfig, WafPackagesDataSource, WafPackagesFilterBlock};
