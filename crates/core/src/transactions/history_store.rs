use log::debug;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::filters_model::{FilterUpdate, TransactionFilters};
use super::transactions_model::{
    DeleteBySourceRequest, Transaction, TransactionExportRequest, UploadSummary,
};
use super::transactions_traits::TransactionGatewayTrait;
use super::view_model::{SortConfig, SortKey, Totals, TransactionListView};
use crate::coa::{ChartOfAccount, CoaGatewayTrait};
use crate::companies::{Company, CompanyGatewayTrait};
use crate::errors::{Error, Result};
use crate::exports::{ExportFormat, ExportedFile};
use crate::filters::{FilterGatewayTrait, FilterPersistence};
use crate::marks::{sort_marks_by_label, Mark, MarkGatewayTrait};
use crate::state::{read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};
use crate::utils::time_utils::today;

/// Gateways the history page reads from.
#[derive(Clone)]
pub struct HistoryStoreDeps {
    pub transactions: Arc<dyn TransactionGatewayTrait>,
    pub companies: Arc<dyn CompanyGatewayTrait>,
    pub marks: Arc<dyn MarkGatewayTrait>,
    pub coa: Arc<dyn CoaGatewayTrait>,
    pub filters: Arc<dyn FilterGatewayTrait>,
}

#[derive(Default)]
struct HistoryState {
    view: TransactionListView,
    companies: Vec<Company>,
    marks: Vec<Mark>,
    coa: Vec<ChartOfAccount>,
    upload_summary: Vec<UploadSummary>,
    filters_loaded: bool,
}

/// State behind the transaction history page.
///
/// Holds the four lookup collections and the list view-model. Every
/// transaction mutation is a server call followed by a full reload; there is
/// no local patching. Mutations run one at a time and only the most recent
/// load is applied.
pub struct HistoryStore {
    transactions: Arc<dyn TransactionGatewayTrait>,
    companies: Arc<dyn CompanyGatewayTrait>,
    marks: Arc<dyn MarkGatewayTrait>,
    coa: Arc<dyn CoaGatewayTrait>,
    saved_filters: FilterPersistence<TransactionFilters>,
    state: RwLock<HistoryState>,
    status: StatusCell,
    loads: RequestSequence,
    mutations: Mutex<()>,
}

impl HistoryStore {
    pub fn new(deps: HistoryStoreDeps, view_name: &str, view: TransactionListView) -> Self {
        Self {
            transactions: deps.transactions,
            companies: deps.companies,
            marks: deps.marks,
            coa: deps.coa,
            saved_filters: FilterPersistence::new(deps.filters, view_name),
            state: RwLock::new(HistoryState {
                view,
                ..Default::default()
            }),
            status: StatusCell::default(),
            loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Enters the page: restores saved filters on first entry with an empty
    /// collection, then loads everything.
    pub async fn activate(&self) -> Result<()> {
        let needs_filters = {
            let state = read_lock(&self.state);
            !state.filters_loaded && state.view.transactions().is_empty()
        };
        if needs_filters {
            let saved = self.saved_filters.load().await;
            let mut state = write_lock(&self.state);
            if let Some(filters) = saved {
                debug!("Restored {} filters", self.saved_filters.view_name());
                state.view.set_filters(filters);
            }
            state.filters_loaded = true;
        }
        self.load_data().await
    }

    /// Fetches transactions, companies, marks and accounts together.
    ///
    /// Nothing is committed unless all four succeed. A response that is no
    /// longer the latest issued load is dropped.
    pub async fn load_data(&self) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.loads.issue();
        let fetched = tokio::try_join!(
            self.transactions.list_transactions(),
            self.companies.list_companies(),
            self.marks.list_marks(),
            self.coa.list_coa(),
        );
        let (transactions, companies, marks, coa) = match fetched {
            Ok(lists) => lists,
            Err(e) if !self.loads.is_latest(token) => return Err(e),
            Err(e) => return Err(self.status.fail(e, "Failed to load data")),
        };
        if !self.loads.is_latest(token) {
            return Ok(());
        }
        debug!(
            "Loaded {} transactions, {} companies, {} marks, {} accounts",
            transactions.len(),
            companies.len(),
            marks.len(),
            coa.len()
        );
        {
            let mut state = write_lock(&self.state);
            state.view.replace_transactions(transactions);
            state.companies = companies;
            state.marks = marks;
            state.coa = coa;
        }
        self.status.clear_error();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filters, sort, paging, selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Changes one criterion, resets to page 1 and saves the filters.
    pub async fn set_filter(&self, update: FilterUpdate) {
        let filters = {
            let mut state = write_lock(&self.state);
            state.view.set_filter(update);
            state.view.filters().clone()
        };
        self.saved_filters.save(&filters).await;
    }

    /// Applies several changes with a single save.
    pub async fn update_filters(&self, f: impl FnOnce(&mut TransactionFilters) + Send) {
        let filters = {
            let mut state = write_lock(&self.state);
            state.view.update_filters(f);
            state.view.filters().clone()
        };
        self.saved_filters.save(&filters).await;
    }

    pub async fn reset_filters(&self) {
        let filters = {
            let mut state = write_lock(&self.state);
            state.view.reset_filters();
            state.view.filters().clone()
        };
        self.saved_filters.save(&filters).await;
    }

    pub fn toggle_sort(&self, key: SortKey) {
        write_lock(&self.state).view.toggle_sort(key);
    }

    pub fn set_page(&self, page: usize) {
        write_lock(&self.state).view.set_page(page);
    }

    pub fn next_page(&self) {
        write_lock(&self.state).view.next_page();
    }

    pub fn prev_page(&self) {
        write_lock(&self.state).view.prev_page();
    }

    pub fn toggle_selection(&self, transaction_id: &str) -> bool {
        write_lock(&self.state).view.toggle_selection(transaction_id)
    }

    pub fn select_all(&self) {
        write_lock(&self.state).view.select_all();
    }

    pub fn deselect_all(&self) {
        write_lock(&self.state).view.deselect_all();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn assign_mark(&self, transaction_id: &str, mark_id: Option<&str>) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.transactions
            .assign_mark(transaction_id, mark_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to assign mark"))?;
        self.load_data().await
    }

    pub async fn assign_company(
        &self,
        transaction_id: &str,
        company_id: Option<&str>,
    ) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.transactions
            .assign_company(transaction_id, company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to assign company"))?;
        self.load_data().await
    }

    pub async fn update_notes(&self, transaction_id: &str, notes: &str) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.transactions
            .update_notes(transaction_id, notes)
            .await
            .map_err(|e| self.status.fail(e, "Failed to update notes"))?;
        self.load_data().await
    }

    /// Deletes one transaction. The reload drops it from the selection.
    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.transactions
            .delete_transaction(transaction_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete transaction"))?;
        self.load_data().await
    }

    pub async fn bulk_assign_mark(&self, mark_id: Option<&str>) -> Result<()> {
        const FAILED: &str = "Failed to assign mark";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        let ids = self.require_selection(FAILED)?;
        self.transactions
            .bulk_assign_mark(&ids, mark_id)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.finish_bulk().await
    }

    pub async fn bulk_assign_company(&self, company_id: Option<&str>) -> Result<()> {
        const FAILED: &str = "Failed to assign company";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        let ids = self.require_selection(FAILED)?;
        self.transactions
            .bulk_assign_company(&ids, company_id)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.finish_bulk().await
    }

    pub async fn bulk_delete(&self) -> Result<()> {
        const FAILED: &str = "Failed to delete transactions";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        let ids = self.require_selection(FAILED)?;
        self.transactions
            .bulk_delete(&ids)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.finish_bulk().await
    }

    /// Deletes one import batch, then reloads.
    pub async fn delete_by_source(&self, request: DeleteBySourceRequest) -> Result<()> {
        const FAILED: &str = "Failed to delete transactions";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        if request.source_file.trim().is_empty() {
            return Err(self
                .status
                .fail(Error::invalid_input("source_file is required"), FAILED));
        }
        self.transactions
            .delete_by_source(&request)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.load_data().await?;
        self.refresh_upload_summary().await
    }

    fn require_selection(&self, fallback: &str) -> Result<Vec<String>> {
        let ids = read_lock(&self.state).view.selected_ids();
        if ids.is_empty() {
            return Err(self
                .status
                .fail(Error::invalid_input("No transactions selected"), fallback));
        }
        Ok(ids)
    }

    async fn finish_bulk(&self) -> Result<()> {
        write_lock(&self.state).view.deselect_all();
        self.load_data().await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Upload batches and export
    // ─────────────────────────────────────────────────────────────────────────

    /// Per-file import summary. Primary read.
    pub async fn upload_summary(&self) -> Result<Vec<UploadSummary>> {
        self.refresh_upload_summary().await?;
        Ok(self.upload_summaries())
    }

    async fn refresh_upload_summary(&self) -> Result<()> {
        let _loading = self.status.begin();
        let summary = self
            .transactions
            .upload_summary()
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch upload summary"))?;
        write_lock(&self.state).upload_summary = summary;
        Ok(())
    }

    /// Exports the transactions matching the current filters.
    pub async fn export(&self, format: ExportFormat) -> Result<ExportedFile> {
        let _loading = self.status.begin();
        let request = TransactionExportRequest {
            format,
            filters: self.filters(),
        };
        let blob = self
            .transactions
            .export_transactions(&request)
            .await
            .map_err(|e| self.status.fail(e, "Failed to export transactions"))?;
        let file = ExportedFile::from_blob("transactions", format, blob, today());
        debug!("Exported {} ({} bytes)", file.file_name, file.bytes.len());
        Ok(file)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs `f` against the view-model without cloning it.
    pub fn with_view<R>(&self, f: impl FnOnce(&TransactionListView) -> R) -> R {
        f(&read_lock(&self.state).view)
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.with_view(|v| v.transactions().to_vec())
    }

    pub fn filtered(&self) -> Vec<Transaction> {
        self.with_view(|v| v.filtered().into_iter().cloned().collect())
    }

    pub fn paginated(&self) -> Vec<Transaction> {
        self.with_view(|v| v.paginated().into_iter().cloned().collect())
    }

    pub fn total_pages(&self) -> usize {
        self.with_view(|v| v.total_pages())
    }

    pub fn current_page(&self) -> usize {
        self.with_view(|v| v.current_page())
    }

    pub fn filtered_totals(&self) -> Totals {
        self.with_view(|v| v.filtered_totals())
    }

    pub fn page_totals(&self) -> Totals {
        self.with_view(|v| v.page_totals())
    }

    pub fn filters(&self) -> TransactionFilters {
        self.with_view(|v| v.filters().clone())
    }

    pub fn sort(&self) -> SortConfig {
        self.with_view(|v| v.sort())
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.with_view(|v| v.selected_ids())
    }

    pub fn available_years(&self) -> Vec<String> {
        self.with_view(|v| v.available_years())
    }

    pub fn companies(&self) -> Vec<Company> {
        read_lock(&self.state).companies.clone()
    }

    pub fn marks(&self) -> Vec<Mark> {
        read_lock(&self.state).marks.clone()
    }

    pub fn sorted_marks(&self) -> Vec<Mark> {
        sort_marks_by_label(&read_lock(&self.state).marks)
    }

    pub fn coa(&self) -> Vec<ChartOfAccount> {
        read_lock(&self.state).coa.clone()
    }

    pub fn upload_summaries(&self) -> Vec<UploadSummary> {
        read_lock(&self.state).upload_summary.clone()
    }
}
