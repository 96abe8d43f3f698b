//! Managed resource Trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;
use crate::schema::Schema;

/// CRUD callbacks of one managed resource type.
///
/// State crosses this boundary as a JSON object; implementations
/// deserialize it into their own model.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. `cloudflare_zone_cache_variants`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Create the remote object and return the refreshed state
    ///
    /// # Arguments
    /// * `config` - Validated configuration object
    async fn create(&self, config: &Value) -> CoreResult<Value>;

    /// Refresh state from the remote object
    ///
    /// Returns `None` when the object no longer exists, which clears the ID.
    async fn read(&self, state: &Value) -> CoreResult<Option<Value>>;

    /// Apply changed configuration and return the refreshed state
    ///
    /// # Arguments
    /// * `config` - Validated configuration object
    /// * `prior` - State recorded before this change
    async fn update(&self, config: &Value, prior: &Value) -> CoreResult<Value>;

    /// Remove the remote object. An already absent object is not an error.
    async fn delete(&self, state: &Value) -> CoreResult<()>;

    /// Build state from an import identifier
    ///
    /// Returns `None` when nothing exists under that identifier.
    async fn import(&self, id: &str) -> CoreResult<Option<Value>>;
}
