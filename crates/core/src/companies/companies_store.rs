use log::debug;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::companies_model::{Company, CompanyInput};
use super::companies_traits::CompanyGatewayTrait;
use crate::errors::Result;
use crate::state::{read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};

/// Company list state. Every mutation reconciles with a refetch.
pub struct CompanyStore {
    gateway: Arc<dyn CompanyGatewayTrait>,
    companies: RwLock<Vec<Company>>,
    status: StatusCell,
    loads: RequestSequence,
    mutations: Mutex<()>,
}

impl CompanyStore {
    pub fn new(gateway: Arc<dyn CompanyGatewayTrait>) -> Self {
        Self {
            gateway,
            companies: RwLock::new(Vec::new()),
            status: StatusCell::default(),
            loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn companies(&self) -> Vec<Company> {
        read_lock(&self.companies).clone()
    }

    pub fn find(&self, company_id: &str) -> Option<Company> {
        read_lock(&self.companies)
            .iter()
            .find(|c| c.id == company_id)
            .cloned()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    /// Replaces the list with the server's. Primary action.
    pub async fn fetch_companies(&self) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.loads.issue();
        match self.gateway.list_companies().await {
            Ok(companies) => {
                if self.loads.is_latest(token) {
                    debug!("Loaded {} companies", companies.len());
                    *write_lock(&self.companies) = companies;
                    self.status.clear_error();
                }
                Ok(())
            }
            Err(e) => Err(self.status.fail(e, "Failed to fetch companies")),
        }
    }

    pub async fn create_company(&self, input: CompanyInput) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input
            .validate()
            .map_err(|e| self.status.fail(e, "Failed to create company"))?;
        self.gateway
            .create_company(&input)
            .await
            .map_err(|e| self.status.fail(e, "Failed to create company"))?;
        self.fetch_companies().await
    }

    pub async fn update_company(&self, company_id: &str, input: CompanyInput) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input
            .validate()
            .map_err(|e| self.status.fail(e, "Failed to update company"))?;
        self.gateway
            .update_company(company_id, &input)
            .await
            .map_err(|e| self.status.fail(e, "Failed to update company"))?;
        self.fetch_companies().await
    }

    /// Deletes a company. The backend detaches its transactions first.
    pub async fn delete_company(&self, company_id: &str) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .delete_company(company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete company"))?;
        self.fetch_companies().await
    }
}
