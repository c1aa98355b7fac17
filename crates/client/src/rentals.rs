use async_trait::async_trait;
use serde_json::json;

use ledgerdesk_core::errors::Result;
use ledgerdesk_core::rentals::{
    ContractCreated, RentalContract, RentalContractInput, RentalGatewayTrait, RentalLocation,
    RentalLocationInput, RentalOutlet, RentalOutletInput,
};
use ledgerdesk_core::shared::Ack;
use ledgerdesk_core::transactions::Transaction;

use crate::client::{opt, segment, ApiClient};

#[async_trait]
impl RentalGatewayTrait for ApiClient {
    async fn list_contracts(
        &self,
        company_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<RentalContract>> {
        self.get_field(
            "/rental-contracts",
            &[("company_id", opt(company_id)), ("status", opt(status))],
            "contracts",
        )
        .await
    }

    async fn create_contract(&self, input: &RentalContractInput) -> Result<ContractCreated> {
        self.post("/rental-contracts", input).await
    }

    async fn contract_transactions(&self, contract_id: &str) -> Result<Vec<Transaction>> {
        self.get_field(
            &format!("/rental-contracts/{}/transactions", segment(contract_id)),
            &[],
            "transactions",
        )
        .await
    }

    async fn link_transaction(&self, contract_id: &str, transaction_id: &str) -> Result<Ack> {
        self.post(
            &format!("/rental-contracts/{}/link-transaction", segment(contract_id)),
            &json!({ "transaction_id": transaction_id }),
        )
        .await
    }

    async fn linkable_transactions(
        &self,
        company_id: Option<&str>,
        current_contract_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        self.get_field(
            "/rental-contracts/linkable-transactions",
            &[
                ("company_id", opt(company_id)),
                ("current_contract_id", opt(current_contract_id)),
            ],
            "transactions",
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Locations
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_locations(&self, company_id: Option<&str>) -> Result<Vec<RentalLocation>> {
        self.get_field(
            "/rental-locations",
            &[("company_id", opt(company_id))],
            "locations",
        )
        .await
    }

    async fn create_location(&self, input: &RentalLocationInput) -> Result<Ack> {
        self.post("/rental-locations", input).await
    }

    async fn update_location(
        &self,
        location_id: &str,
        input: &RentalLocationInput,
    ) -> Result<Ack> {
        self.put(
            &format!("/rental-locations/{}", segment(location_id)),
            input,
        )
        .await
    }

    async fn delete_location(&self, location_id: &str) -> Result<Ack> {
        self.delete(&format!("/rental-locations/{}", segment(location_id)))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outlets
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_outlets(&self, company_id: Option<&str>) -> Result<Vec<RentalOutlet>> {
        self.get_field("/stores", &[("company_id", opt(company_id))], "stores")
            .await
    }

    async fn create_outlet(&self, input: &RentalOutletInput) -> Result<Ack> {
        self.post("/stores", input).await
    }
}
