use async_trait::async_trait;
use serde_json::{json, Value};

use ledgerdesk_core::errors::Result;
use ledgerdesk_core::filters::FilterGatewayTrait;
use ledgerdesk_core::shared::Ack;

use crate::client::{segment, unwrap_field, ApiClient};

#[async_trait]
impl FilterGatewayTrait for ApiClient {
    /// Saved filters for one view; `Value::Null` when nothing was saved.
    async fn load_filters(&self, view_name: &str) -> Result<Value> {
        let body: Value = self
            .get(&format!("/filters/{}", segment(view_name)), &[])
            .await?;
        unwrap_field(body, "filters")
    }

    async fn save_filters(&self, view_name: &str, filters: &Value) -> Result<Ack> {
        self.post(
            "/filters",
            &json!({ "view_name": view_name, "filters": filters }),
        )
        .await
    }
}
