use async_trait::async_trait;

use crate::errors::Result;
use crate::marks::marks_model::{Mark, MarkInput};
use crate::shared::Ack;

/// Remote calls for the `/marks` resource.
#[async_trait]
pub trait MarkGatewayTrait: Send + Sync {
    async fn list_marks(&self) -> Result<Vec<Mark>>;
    async fn create_mark(&self, input: &MarkInput) -> Result<Ack>;
    async fn update_mark(&self, mark_id: &str, input: &MarkInput) -> Result<Ack>;
    async fn delete_mark(&self, mark_id: &str) -> Result<Ack>;
}
