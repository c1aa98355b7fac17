//! Transaction list view-model: filtering, sorting, pagination, totals and
//! the bulk-selection set over the in-memory transaction collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::transactions::filters_model::{FilterUpdate, TransactionFilters};
use crate::transactions::transactions_model::{DbCr, Transaction};

/// Column the list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    TxnDate,
    Amount,
    DbCr,
    BankCode,
    Description,
    CompanyName,
    Mark,
    SourceFile,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TxnDate => "txn_date",
            SortKey::Amount => "amount",
            SortKey::DbCr => "db_cr",
            SortKey::BankCode => "bank_code",
            SortKey::Description => "description",
            SortKey::CompanyName => "company_name",
            SortKey::Mark => "mark",
            SortKey::SourceFile => "source_file",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortKey::TxnDate => a.txn_date.cmp(&b.txn_date),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::DbCr => a.db_cr.cmp(&b.db_cr),
            SortKey::BankCode => a.bank_code.cmp(&b.bank_code),
            SortKey::Description => a.description.cmp(&b.description),
            SortKey::CompanyName => a.company_name.cmp(&b.company_name),
            SortKey::Mark => a.personal_use.cmp(&b.personal_use),
            SortKey::SourceFile => a.source_file.cmp(&b.source_file),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "txn_date" | "date" => Ok(SortKey::TxnDate),
            "amount" => Ok(SortKey::Amount),
            "db_cr" => Ok(SortKey::DbCr),
            "bank_code" | "bank" => Ok(SortKey::BankCode),
            "description" => Ok(SortKey::Description),
            "company_name" | "company" => Ok(SortKey::CompanyName),
            "mark" | "personal_use" => Ok(SortKey::Mark),
            "source_file" => Ok(SortKey::SourceFile),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::TxnDate,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// Same key flips the direction; a new key starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = self.key.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Net, debit-only and credit-only sums over a sequence of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub net: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Totals {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Totals::default(), |mut totals, txn| {
                match txn.db_cr {
                    DbCr::Debit => totals.debit += txn.amount,
                    DbCr::Credit => totals.credit += txn.amount,
                }
                totals.net += txn.signed_amount();
                totals
            })
    }
}

/// View state over the full transaction collection.
#[derive(Debug, Clone)]
pub struct TransactionListView {
    transactions: Vec<Transaction>,
    filters: TransactionFilters,
    sort: SortConfig,
    current_page: usize,
    page_size: usize,
    selection: BTreeSet<String>,
}

impl Default for TransactionListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TransactionListView {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            transactions: Vec::new(),
            filters: TransactionFilters::default(),
            sort: SortConfig::default(),
            current_page: 1,
            page_size: page_size.max(1),
            selection: BTreeSet::new(),
        }
    }

    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn filters(&self) -> &TransactionFilters {
        &self.filters
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived views
    // ─────────────────────────────────────────────────────────────────────

    /// Transactions passing the filters, in sort order.
    pub fn filtered(&self) -> Vec<&Transaction> {
        let mut result: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| self.filters.matches(t))
            .collect();
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }

    /// The current page of [`Self::filtered`].
    pub fn paginated(&self) -> Vec<&Transaction> {
        let start = (self.current_page - 1) * self.page_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| self.filters.matches(t))
            .count()
    }

    /// `ceil(filtered / page_size)`; zero when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size)
    }

    pub fn filtered_totals(&self) -> Totals {
        Totals::of(self.filtered())
    }

    pub fn page_totals(&self) -> Totals {
        Totals::of(self.paginated())
    }

    /// Distinct transaction years, newest first.
    pub fn available_years(&self) -> Vec<String> {
        let years: BTreeSet<&str> = self
            .transactions
            .iter()
            .map(|t| t.year())
            .filter(|y| !y.is_empty())
            .collect();
        years.into_iter().rev().map(str::to_string).collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Filters, sort and paging
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.current_page = 1;
    }

    /// Applies several changes at once; the page resets once.
    pub fn update_filters(&mut self, f: impl FnOnce(&mut TransactionFilters)) {
        f(&mut self.filters);
        self.current_page = 1;
    }

    pub fn set_filters(&mut self, filters: TransactionFilters) {
        self.filters = filters;
        self.current_page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.set_filters(TransactionFilters::default());
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    /// Moves to `page`, clamped to `[1, max(total_pages, 1)]`.
    pub fn set_page(&mut self, page: usize) {
        let last = self.total_pages().max(1);
        self.current_page = page.clamp(1, last);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Flips membership of `id`. Ids absent from the collection are ignored.
    /// Returns whether the id is selected afterwards.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.selection.remove(id) {
            return false;
        }
        if self.transactions.iter().any(|t| t.id == id) {
            self.selection.insert(id.to_string());
            return true;
        }
        false
    }

    /// Adds every filtered id (all pages) to the current selection.
    pub fn select_all(&mut self) {
        let ids: Vec<String> = self.filtered().into_iter().map(|t| t.id.clone()).collect();
        self.selection.extend(ids);
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Collection
    // ─────────────────────────────────────────────────────────────────────

    /// Replaces the collection wholesale. The selection is pruned to ids
    /// still present and the page is clamped to the new page count.
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
        {
            let present: BTreeSet<&str> =
                self.transactions.iter().map(|t| t.id.as_str()).collect();
            self.selection.retain(|id| present.contains(id.as_str()));
        }
        self.set_page(self.current_page);
    }
}
