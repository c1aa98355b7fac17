use log::{debug, info};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::rentals_model::{
    ContractCreated, RentalContract, RentalContractInput, RentalLocation, RentalLocationInput,
    RentalOutlet, RentalOutletInput,
};
use super::rentals_traits::RentalGatewayTrait;
use crate::errors::Result;
use crate::state::{read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};
use crate::transactions::Transaction;

#[derive(Default)]
struct RentalState {
    contracts: Vec<RentalContract>,
    locations: Vec<RentalLocation>,
    outlets: Vec<RentalOutlet>,
    contract_transactions: Vec<Transaction>,
    linkable: Vec<Transaction>,
}

/// Contracts, locations and shop units of the rentals page.
pub struct RentalStore {
    gateway: Arc<dyn RentalGatewayTrait>,
    state: RwLock<RentalState>,
    status: StatusCell,
    contract_loads: RequestSequence,
    mutations: Mutex<()>,
}

impl RentalStore {
    pub fn new(gateway: Arc<dyn RentalGatewayTrait>) -> Self {
        Self {
            gateway,
            state: RwLock::new(RentalState::default()),
            status: StatusCell::default(),
            contract_loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn contracts(&self) -> Vec<RentalContract> {
        read_lock(&self.state).contracts.clone()
    }

    pub fn locations(&self) -> Vec<RentalLocation> {
        read_lock(&self.state).locations.clone()
    }

    pub fn outlets(&self) -> Vec<RentalOutlet> {
        read_lock(&self.state).outlets.clone()
    }

    pub fn contract_transactions(&self) -> Vec<Transaction> {
        read_lock(&self.state).contract_transactions.clone()
    }

    pub fn linkable_transactions(&self) -> Vec<Transaction> {
        read_lock(&self.state).linkable.clone()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Contracts
    // ────────────────────────────────────────────────────────────────────────

    pub async fn fetch_contracts(
        &self,
        company_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.contract_loads.issue();
        let contracts = self
            .gateway
            .list_contracts(company_id, status)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch rental contracts"))?;
        if self.contract_loads.is_latest(token) {
            debug!("Loaded {} rental contracts", contracts.len());
            write_lock(&self.state).contracts = contracts;
            self.status.clear_error();
        }
        Ok(())
    }

    /// Creates a contract with its linked payments, then reloads the
    /// company's contracts.
    pub async fn create_contract(&self, input: RentalContractInput) -> Result<ContractCreated> {
        const FAILED: &str = "Failed to create rental contract";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input.validate().map_err(|e| self.status.fail(e, FAILED))?;
        let created = self
            .gateway
            .create_contract(&input)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        if created.prepaid_auto_created {
            info!(
                "Prepaid expense {:?} booked for contract {:?}",
                created.prepaid_expense_id, created.id
            );
        }
        self.fetch_contracts(Some(&input.company_id), None).await?;
        Ok(created)
    }

    pub async fn fetch_contract_transactions(&self, contract_id: &str) -> Result<()> {
        let _loading = self.status.begin();
        let transactions = self
            .gateway
            .contract_transactions(contract_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch contract transactions"))?;
        write_lock(&self.state).contract_transactions = transactions;
        Ok(())
    }

    pub async fn fetch_linkable_transactions(
        &self,
        company_id: Option<&str>,
        current_contract_id: Option<&str>,
    ) -> Result<()> {
        let _loading = self.status.begin();
        let transactions = self
            .gateway
            .linkable_transactions(company_id, current_contract_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch linkable transactions"))?;
        write_lock(&self.state).linkable = transactions;
        Ok(())
    }

    /// Ties a payment to a contract and reloads the contract's payments.
    pub async fn link_transaction(&self, contract_id: &str, transaction_id: &str) -> Result<()> {
        {
            let _guard = self.mutations.lock().await;
            let _loading = self.status.begin();
            self.gateway
                .link_transaction(contract_id, transaction_id)
                .await
                .map_err(|e| self.status.fail(e, "Failed to link transaction"))?;
        }
        write_lock(&self.state)
            .linkable
            .retain(|t| t.id != transaction_id);
        self.fetch_contract_transactions(contract_id).await
    }

    // ────────────────────────────────────────────────────────────────────────
    // Locations
    // ────────────────────────────────────────────────────────────────────────

    pub async fn fetch_locations(&self, company_id: Option<&str>) -> Result<()> {
        let _loading = self.status.begin();
        let locations = self
            .gateway
            .list_locations(company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch rental locations"))?;
        write_lock(&self.state).locations = locations;
        Ok(())
    }

    pub async fn create_location(&self, input: RentalLocationInput) -> Result<()> {
        const FAILED: &str = "Failed to create location";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input.validate().map_err(|e| self.status.fail(e, FAILED))?;
        self.gateway
            .create_location(&input)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.fetch_locations(Some(&input.company_id)).await
    }

    pub async fn update_location(&self, location_id: &str, input: RentalLocationInput) -> Result<()> {
        const FAILED: &str = "Failed to update location";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input.validate().map_err(|e| self.status.fail(e, FAILED))?;
        self.gateway
            .update_location(location_id, &input)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.fetch_locations(Some(&input.company_id)).await
    }

    pub async fn delete_location(&self, location_id: &str) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .delete_location(location_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete location"))?;
        write_lock(&self.state)
            .locations
            .retain(|l| l.id != location_id);
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Shop units
    // ────────────────────────────────────────────────────────────────────────

    pub async fn fetch_outlets(&self, company_id: Option<&str>) -> Result<()> {
        let _loading = self.status.begin();
        let outlets = self
            .gateway
            .list_outlets(company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch stores"))?;
        write_lock(&self.state).outlets = outlets;
        Ok(())
    }

    pub async fn create_outlet(&self, input: RentalOutletInput) -> Result<()> {
        const FAILED: &str = "Failed to create store";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input.validate().map_err(|e| self.status.fail(e, FAILED))?;
        self.gateway
            .create_outlet(&input)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.fetch_outlets(Some(&input.company_id)).await
    }
}
