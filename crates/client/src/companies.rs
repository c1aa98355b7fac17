use async_trait::async_trait;

use ledgerdesk_core::companies::{Company, CompanyGatewayTrait, CompanyInput};
use ledgerdesk_core::errors::Result;
use ledgerdesk_core::shared::Ack;

use crate::client::{segment, ApiClient};

#[async_trait]
impl CompanyGatewayTrait for ApiClient {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        self.get_field("/companies", &[], "companies").await
    }

    async fn create_company(&self, input: &CompanyInput) -> Result<Ack> {
        self.post("/companies", input).await
    }

    async fn update_company(&self, company_id: &str, input: &CompanyInput) -> Result<Ack> {
        self.put(&format!("/companies/{}", segment(company_id)), input)
            .await
    }

    async fn delete_company(&self, company_id: &str) -> Result<Ack> {
        self.delete(&format!("/companies/{}", segment(company_id)))
            .await
    }
}
