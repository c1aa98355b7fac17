use async_trait::async_trait;

use super::products_model::{Product, ProductInput};
use crate::errors::Result;
use crate::shared::Ack;

/// Remote calls for `/products`.
#[async_trait]
pub trait ProductGatewayTrait: Send + Sync {
    async fn list_products(&self, company_id: Option<&str>) -> Result<Vec<Product>>;
    async fn create_product(&self, input: &ProductInput) -> Result<Ack>;
    async fn update_product(&self, product_id: &str, input: &ProductInput) -> Result<Ack>;
    async fn delete_product(&self, product_id: &str) -> Result<Ack>;
}
