use log::debug;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::coa_model::{
    coa_by_category, coa_options, ChartOfAccount, CoaGroups, CoaInput, CoaOption, MappingType,
    MarkCoaMapping, NewMarkCoaMapping,
};
use super::coa_traits::CoaGatewayTrait;
use crate::errors::{Error, Result};
use crate::shared::Ack;
use crate::state::{or_default, read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};

pub struct CoaStore {
    gateway: Arc<dyn CoaGatewayTrait>,
    accounts: RwLock<Vec<ChartOfAccount>>,
    status: StatusCell,
    loads: RequestSequence,
    mutations: Mutex<()>,
}

impl CoaStore {
    pub fn new(gateway: Arc<dyn CoaGatewayTrait>) -> Self {
        Self {
            gateway,
            accounts: RwLock::new(Vec::new()),
            status: StatusCell::default(),
            loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn accounts(&self) -> Vec<ChartOfAccount> {
        read_lock(&self.accounts).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn coa_by_category(&self) -> CoaGroups {
        coa_by_category(&read_lock(&self.accounts))
    }

    pub fn coa_options(&self) -> Vec<CoaOption> {
        coa_options(&read_lock(&self.accounts))
    }

    pub async fn fetch_coa(&self) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.loads.issue();
        self.status.clear_error();
        match self.gateway.list_coa().await {
            Ok(accounts) => {
                if self.loads.is_latest(token) {
                    debug!("Loaded {} accounts", accounts.len());
                    *write_lock(&self.accounts) = accounts;
                }
                Ok(())
            }
            Err(e) => Err(self.status.fail(e, "Failed to fetch COA")),
        }
    }

    pub async fn create_coa(&self, input: CoaInput) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input
            .validate()
            .map_err(|e| self.status.fail(e, "Failed to create COA"))?;
        let ack = self
            .gateway
            .create_coa(&input)
            .await
            .map_err(|e| self.status.fail(e, "Failed to create COA"))?;
        self.fetch_coa().await?;
        Ok(ack)
    }

    pub async fn update_coa(&self, coa_id: &str, input: CoaInput) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input
            .validate()
            .map_err(|e| self.status.fail(e, "Failed to update COA"))?;
        let ack = self
            .gateway
            .update_coa(coa_id, &input)
            .await
            .map_err(|e| self.status.fail(e, "Failed to update COA"))?;
        self.fetch_coa().await?;
        Ok(ack)
    }

    pub async fn delete_coa(&self, coa_id: &str) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        let ack = self
            .gateway
            .delete_coa(coa_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete COA"))?;
        self.fetch_coa().await?;
        Ok(ack)
    }

    /// Mappings of one mark. Auxiliary read: failures yield an empty list.
    pub async fn fetch_mark_mappings(&self, mark_id: &str) -> Vec<MarkCoaMapping> {
        or_default(
            self.gateway.list_mark_mappings(mark_id).await,
            Vec::new(),
            "Failed to fetch mark mappings",
        )
    }

    pub async fn create_mapping(
        &self,
        mark_id: &str,
        coa_id: &str,
        mapping_type: MappingType,
        notes: Option<String>,
    ) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        if coa_id.trim().is_empty() {
            return Err(self
                .status
                .fail(Error::invalid_input("COA ID is required"), "Failed to create mapping"));
        }
        let mapping = NewMarkCoaMapping {
            coa_id: coa_id.to_string(),
            mapping_type,
            notes,
        };
        self.gateway
            .create_mark_mapping(mark_id, &mapping)
            .await
            .map_err(|e| self.status.fail(e, "Failed to create mapping"))
    }

    pub async fn delete_mapping(&self, mapping_id: &str) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .delete_mark_mapping(mapping_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete mapping"))
    }
}
