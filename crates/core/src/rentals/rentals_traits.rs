use async_trait::async_trait;

use super::rentals_model::{
    ContractCreated, RentalContract, RentalContractInput, RentalLocation, RentalLocationInput,
    RentalOutlet, RentalOutletInput,
};
use crate::errors::Result;
use crate::shared::Ack;
use crate::transactions::Transaction;

/// Remote calls for `/rental-contracts`, `/rental-locations` and `/stores`.
#[async_trait]
pub trait RentalGatewayTrait: Send + Sync {
    async fn list_contracts(
        &self,
        company_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<RentalContract>>;
    async fn create_contract(&self, input: &RentalContractInput) -> Result<ContractCreated>;
    async fn contract_transactions(&self, contract_id: &str) -> Result<Vec<Transaction>>;
    async fn link_transaction(&self, contract_id: &str, transaction_id: &str) -> Result<Ack>;

    /// Rent-like payments not yet tied to another contract.
    async fn linkable_transactions(
        &self,
        company_id: Option<&str>,
        current_contract_id: Option<&str>,
    ) -> Result<Vec<Transaction>>;

    async fn list_locations(&self, company_id: Option<&str>) -> Result<Vec<RentalLocation>>;
    async fn create_location(&self, input: &RentalLocationInput) -> Result<Ack>;
    async fn update_location(&self, location_id: &str, input: &RentalLocationInput)
        -> Result<Ack>;
    async fn delete_location(&self, location_id: &str) -> Result<Ack>;

    async fn list_outlets(&self, company_id: Option<&str>) -> Result<Vec<RentalOutlet>>;
    async fn create_outlet(&self, input: &RentalOutletInput) -> Result<Ack>;
}
