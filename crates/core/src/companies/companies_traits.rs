use async_trait::async_trait;

use crate::companies::companies_model::{Company, CompanyInput};
use crate::errors::Result;
use crate::shared::Ack;

/// Remote calls for the `/companies` resource.
#[async_trait]
pub trait CompanyGatewayTrait: Send + Sync {
    async fn list_companies(&self) -> Result<Vec<Company>>;
    async fn create_company(&self, input: &CompanyInput) -> Result<Ack>;
    async fn update_company(&self, company_id: &str, input: &CompanyInput) -> Result<Ack>;
    async fn delete_company(&self, company_id: &str) -> Result<Ack>;
}
