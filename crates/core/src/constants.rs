/// Default number of transactions per page in the history view.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter persistence key of the transaction history view.
pub const HISTORY_VIEW: &str = "history";

/// Filter persistence key of the financial reports view.
pub const REPORTS_VIEW: &str = "reports";

/// Filter persistence key of the monthly revenue view.
pub const MONTHLY_REVENUE_VIEW: &str = "monthly_revenue";

/// COA code used for amortization expense when the backend does not supply one.
pub const DEFAULT_AMORTIZATION_COA_CODE: &str = "5314";

/// Default useful life (years) for mark-based amortization.
pub const DEFAULT_ASSET_USEFUL_LIFE: &str = "5";

/// Default amortization rate (percent) for mark-based amortization.
pub const DEFAULT_AMORTIZATION_RATE: &str = "20.00";

/// Marks that route purchases into amortization when mark-based
/// amortization is enabled and the backend settings are unavailable.
pub const DEFAULT_AMORTIZATION_ASSET_MARKS: [&str; 3] = [
    "pembelian aset perusahaan - berwujud",
    "pembelian aset perusahaan - tidak berwujud",
    "pembelian bangunan",
];

/// Largest statement file the converter accepts.
pub const MAX_STATEMENT_BYTES: usize = 10 * 1024 * 1024;

/// Bank code used when the caller does not pick one.
pub const DEFAULT_BANK_CODE: &str = "bca";

/// The only bank whose statements arrive as CSV.
pub const CSV_STATEMENT_BANK: &str = "bri";
