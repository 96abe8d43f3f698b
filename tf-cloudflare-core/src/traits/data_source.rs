//! Data source Trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;
use crate::schema::Schema;

/// Read-only lookup producing computed state from configuration.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name, e.g. `cloudflare_waf_groups`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Resolve the configuration into state
    ///
    /// # Arguments
    /// * `config` - Validated configuration object
    ///
    /// The returned state carries a synthetic `id`.
    async fn read(&self, config: &Value) -> CoreResult<Value>;
}
