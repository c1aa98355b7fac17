use async_trait::async_trait;

use ledgerdesk_core::errors::Result;
use ledgerdesk_core::products::{Product, ProductGatewayTrait, ProductInput};
use ledgerdesk_core::shared::Ack;

use crate::client::{opt, segment, ApiClient};

#[async_trait]
impl ProductGatewayTrait for ApiClient {
    async fn list_products(&self, company_id: Option<&str>) -> Result<Vec<Product>> {
        self.get_field(
            "/products",
            &[("company_id", opt(company_id))],
            "products",
        )
        .await
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Ack> {
        self.post("/products", input).await
    }

    async fn update_product(&self, product_id: &str, input: &ProductInput) -> Result<Ack> {
        self.put(&format!("/products/{}", segment(product_id)), input)
            .await
    }

    async fn delete_product(&self, product_id: &str) -> Result<Ack> {
        self.delete(&format!("/products/{}", segment(product_id)))
            .await
    }
}
