use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::shared::Ack;

/// Backend key-value store for per-view filter blobs.
#[async_trait]
pub trait FilterGatewayTrait: Send + Sync {
    /// The stored blob for `view_name`; `{}` when nothing was saved.
    async fn load_filters(&self, view_name: &str) -> Result<Value>;

    /// Replaces the stored blob for `view_name`.
    async fn save_filters(&self, view_name: &str, filters: &Value) -> Result<Ack>;
}
