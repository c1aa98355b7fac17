pub mod convert;
pub mod lookups;
pub mod open;
pub mod reports;
pub mod transactions;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ledgerdesk_core::exports::ExportFormat;
use ledgerdesk_core::transactions::{
    DbCr, MarkStatus, SortConfig, SortDirection, SortKey, TransactionFilters,
};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "ledgerdesk", about = "Browse and maintain LedgerDesk bookkeeping data.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with imported bank transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionCommands,
    },
    /// Fetch financial reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Convert a bank statement (PDF, or CSV for BRI).
    Convert {
        /// Statement file
        file: PathBuf,
        /// Bank code, e.g. bca, bri, mandiri
        #[arg(long, default_value = "bca")]
        bank: String,
        #[arg(long)]
        company: Option<String>,
        /// PDF password
        #[arg(long)]
        password: Option<String>,
        /// Year for statements whose rows omit it
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_enum, default_value = "excel")]
        format: FormatArg,
        /// Write to the ledger instead of previewing
        #[arg(long)]
        commit: bool,
    },
    /// List companies.
    Companies,
    /// List marks, sorted by label.
    Marks,
    /// List the chart of accounts, grouped by category.
    Coa,
    /// Show the page behind an application path, e.g. /history.
    Open { path: String },
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Show one page of the filtered, sorted list with totals.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        sort: SortArgs,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Assign a mark to every transaction matching the filters.
    BulkMark {
        /// Mark id, or "none" to clear
        mark: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Assign a company to every transaction matching the filters.
    BulkCompany {
        /// Company id, or "none" to clear
        #[arg(value_name = "COMPANY")]
        target: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Delete every transaction matching the filters.
    BulkDelete {
        #[command(flatten)]
        filters: FilterArgs,
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
    /// Set the notes of one transaction.
    Notes { id: String, notes: String },
    /// Export the transactions matching the filters.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value = "excel")]
        format: FormatArg,
        /// Output directory (default: LEDGERDESK_EXPORT_DIR or .)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Per-file upload summary.
    Sources,
    /// Delete every transaction imported from one statement file.
    DeleteSource {
        source_file: String,
        #[arg(long)]
        bank: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income statement for a period.
    Income(PeriodArgs),
    /// Balance sheet as of a date.
    Balance {
        /// YYYY-MM-DD (default: today on the backend)
        #[arg(long)]
        as_of: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
    /// Cash flow for a period.
    Cashflow(PeriodArgs),
    /// Payroll salary summary for a period.
    Payroll(PeriodArgs),
    /// Revenue per month against the previous year.
    Revenue {
        year: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// Years that have data.
    Years {
        #[arg(long)]
        company: Option<String>,
    },
    /// All core reports for the saved report filters.
    All,
    /// Export a report.
    Export {
        /// Report type, e.g. income_statement, balance_sheet
        report_type: String,
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long, value_enum, default_value = "excel")]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Clone, Default)]
pub struct PeriodArgs {
    /// YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
}

/// Transaction list filters. Given filters replace the saved ones for the
/// history view.
#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub year: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// "marked", "unmarked" or a mark id; repeatable
    #[arg(long = "mark")]
    pub marks: Vec<String>,
    /// Chart-of-accounts id; repeatable
    #[arg(long = "coa")]
    pub coa_ids: Vec<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum)]
    pub side: Option<SideArg>,
    #[arg(long)]
    pub min: Option<Decimal>,
    #[arg(long)]
    pub max: Option<Decimal>,
    /// Ignore saved filters and start from none
    #[arg(long)]
    pub reset: bool,
}

impl FilterArgs {
    pub fn is_empty(&self) -> bool {
        self.to_filters().is_empty()
    }

    pub fn to_filters(&self) -> TransactionFilters {
        TransactionFilters {
            year: self.year.clone(),
            date_start: self.from.clone(),
            date_end: self.to.clone(),
            bank: self.bank.clone(),
            company: self.company.clone(),
            mark_status: self.marks.iter().cloned().map(MarkStatus::from).collect(),
            coa_ids: self.coa_ids.clone(),
            search: self.search.clone(),
            db_cr: self.side.map(DbCr::from),
            amount_min: self.min,
            amount_max: self.max,
        }
    }
}

#[derive(Args, Clone, Default)]
pub struct SortArgs {
    /// txn_date, amount, db_cr, bank, description, company, mark, source_file
    #[arg(long)]
    pub sort: Option<SortKey>,
    #[arg(long)]
    pub asc: bool,
}

impl SortArgs {
    pub fn to_sort(&self) -> Option<SortConfig> {
        self.sort.map(|key| SortConfig {
            key,
            direction: if self.asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Excel,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Excel => ExportFormat::Excel,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SideArg {
    Debit,
    Credit,
}

impl From<SideArg> for DbCr {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Debit => DbCr::Debit,
            SideArg::Credit => DbCr::Credit,
        }
    }
}

/// `"none"` (any case) clears the assignment.
pub(crate) fn optional_id(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_arguments_map_to_filters_and_sort() {
        let cli = Cli::parse_from([
            "ledgerdesk", "transactions", "list", "--year", "2024", "--mark", "unmarked",
            "--mark", "9", "--side", "debit", "--min", "1000", "--sort", "amount", "--asc",
            "--page", "2",
        ]);
        let Commands::Transactions {
            command: TransactionCommands::List { filters, sort, page },
        } = cli.command
        else {
            panic!("expected transactions list");
        };
        let filters = filters.to_filters();
        assert_eq!(filters.year.as_deref(), Some("2024"));
        assert_eq!(
            filters.mark_status,
            vec![MarkStatus::Unmarked, MarkStatus::Mark("9".into())]
        );
        assert_eq!(filters.db_cr, Some(DbCr::Debit));
        assert_eq!(filters.amount_min, Some(dec!(1000)));
        assert_eq!(
            sort.to_sort(),
            Some(SortConfig { key: SortKey::Amount, direction: SortDirection::Asc })
        );
        assert_eq!(page, 2);
    }

    #[test]
    fn test_bulk_company_target_is_separate_from_company_filter() {
        let cli = Cli::parse_from([
            "ledgerdesk", "transactions", "bulk-company", "none", "--company", "c1",
        ]);
        let Commands::Transactions {
            command: TransactionCommands::BulkCompany { target, filters },
        } = cli.command
        else {
            panic!("expected transactions bulk-company");
        };
        assert_eq!(optional_id(&target), None);
        assert_eq!(filters.to_filters().company.as_deref(), Some("c1"));
    }

    #[test]
    fn test_optional_id() {
        assert_eq!(optional_id("None"), None);
        assert_eq!(optional_id(" "), None);
        assert_eq!(optional_id("12"), Some("12"));
    }
}
