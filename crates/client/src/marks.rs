use async_trait::async_trait;

use ledgerdesk_core::errors::Result;
use ledgerdesk_core::marks::{Mark, MarkGatewayTrait, MarkInput};
use ledgerdesk_core::shared::Ack;

use crate::client::{segment, ApiClient};

#[async_trait]
impl MarkGatewayTrait for ApiClient {
    async fn list_marks(&self) -> Result<Vec<Mark>> {
        self.get_field("/marks", &[], "marks").await
    }

    async fn create_mark(&self, input: &MarkInput) -> Result<Ack> {
        self.post("/marks", input).await
    }

    async fn update_mark(&self, mark_id: &str, input: &MarkInput) -> Result<Ack> {
        self.put(&format!("/marks/{}", segment(mark_id)), input).await
    }

    async fn delete_mark(&self, mark_id: &str) -> Result<Ack> {
        self.delete(&format!("/marks/{}", segment(mark_id))).await
    }
}
