use log::debug;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::batches_model::{BatchDetails, BatchTransaction, HppBatch, SaveBatchRequest, SavedBatch};
use super::batches_traits::BatchGatewayTrait;
use crate::errors::Result;
use crate::state::{read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};

#[derive(Default)]
struct BatchState {
    batches: Vec<HppBatch>,
    current: Option<BatchDetails>,
    linkable: Vec<BatchTransaction>,
}

/// State behind the HPP batch pages.
pub struct BatchStore {
    gateway: Arc<dyn BatchGatewayTrait>,
    state: RwLock<BatchState>,
    status: StatusCell,
    loads: RequestSequence,
    mutations: Mutex<()>,
}

impl BatchStore {
    pub fn new(gateway: Arc<dyn BatchGatewayTrait>) -> Self {
        Self {
            gateway,
            state: RwLock::new(BatchState::default()),
            status: StatusCell::default(),
            loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn batches(&self) -> Vec<HppBatch> {
        read_lock(&self.state).batches.clone()
    }

    pub fn current_batch(&self) -> Option<BatchDetails> {
        read_lock(&self.state).current.clone()
    }

    pub fn linkable_transactions(&self) -> Vec<BatchTransaction> {
        read_lock(&self.state).linkable.clone()
    }

    pub async fn fetch_batches(&self, company_id: Option<&str>) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.loads.issue();
        let batches = self
            .gateway
            .list_batches(company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch batches"))?;
        if self.loads.is_latest(token) {
            debug!("Loaded {} batches", batches.len());
            write_lock(&self.state).batches = batches;
            self.status.clear_error();
        }
        Ok(())
    }

    pub async fn fetch_batch_details(&self, batch_id: &str) -> Result<BatchDetails> {
        let _loading = self.status.begin();
        let details = self
            .gateway
            .batch_details(batch_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch batch details"))?;
        write_lock(&self.state).current = Some(details.clone());
        Ok(details)
    }

    /// Purchase transactions in a date range, flagged when already batched.
    pub async fn fetch_linkable_transactions(
        &self,
        company_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<()> {
        let _loading = self.status.begin();
        let transactions = self
            .gateway
            .linkable_transactions(company_id, start_date, end_date)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch linkable transactions"))?;
        write_lock(&self.state).linkable = transactions;
        Ok(())
    }

    /// Creates or replaces a batch. The caller refreshes the list.
    pub async fn save_batch(&self, request: SaveBatchRequest) -> Result<SavedBatch> {
        const FAILED: &str = "Failed to save batch";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        request.validate().map_err(|e| self.status.fail(e, FAILED))?;
        let saved = self
            .gateway
            .save_batch(&request)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        debug!("Saved batch {:?}", saved.batch_id);
        Ok(saved)
    }

    /// Deletes a batch and drops it from the local list.
    pub async fn delete_batch(&self, batch_id: &str) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .delete_batch(batch_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete batch"))?;
        let mut state = write_lock(&self.state);
        state.batches.retain(|b| b.id != batch_id);
        if state.current.as_ref().is_some_and(|c| c.batch.id == batch_id) {
            state.current = None;
        }
        Ok(())
    }
}
