use log::debug;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::marks_model::{sort_marks_by_label, Mark, MarkInput};
use super::marks_traits::MarkGatewayTrait;
use crate::errors::Result;
use crate::state::{read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};
use crate::transactions::TransactionGatewayTrait;

/// Mark list state for the marks management page.
pub struct MarkStore {
    gateway: Arc<dyn MarkGatewayTrait>,
    transactions: Arc<dyn TransactionGatewayTrait>,
    marks: RwLock<Vec<Mark>>,
    status: StatusCell,
    loads: RequestSequence,
    mutations: Mutex<()>,
}

impl MarkStore {
    pub fn new(
        gateway: Arc<dyn MarkGatewayTrait>,
        transactions: Arc<dyn TransactionGatewayTrait>,
    ) -> Self {
        Self {
            gateway,
            transactions,
            marks: RwLock::new(Vec::new()),
            status: StatusCell::default(),
            loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn marks(&self) -> Vec<Mark> {
        read_lock(&self.marks).clone()
    }

    pub fn sorted_marks(&self) -> Vec<Mark> {
        sort_marks_by_label(&read_lock(&self.marks))
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub async fn fetch_marks(&self) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.loads.issue();
        match self.gateway.list_marks().await {
            Ok(marks) => {
                if self.loads.is_latest(token) {
                    debug!("Loaded {} marks", marks.len());
                    *write_lock(&self.marks) = marks;
                    self.status.clear_error();
                }
                Ok(())
            }
            Err(e) => Err(self.status.fail(e, "Failed to fetch marks")),
        }
    }

    pub async fn create_mark(&self, input: MarkInput) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input
            .validate()
            .map_err(|e| self.status.fail(e, "Failed to create mark"))?;
        self.gateway
            .create_mark(&input)
            .await
            .map_err(|e| self.status.fail(e, "Failed to create mark"))?;
        self.fetch_marks().await
    }

    pub async fn update_mark(&self, mark_id: &str, input: MarkInput) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .update_mark(mark_id, &input)
            .await
            .map_err(|e| self.status.fail(e, "Failed to update mark"))?;
        self.fetch_marks().await
    }

    /// Deletes a mark. The backend clears it from every transaction first.
    pub async fn delete_mark(&self, mark_id: &str) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .delete_mark(mark_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete mark"))?;
        self.fetch_marks().await
    }

    /// Tags one transaction. Callers holding a transaction list reload it.
    pub async fn assign_mark(&self, transaction_id: &str, mark_id: Option<&str>) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.transactions
            .assign_mark(transaction_id, mark_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to assign mark"))?;
        Ok(())
    }
}
