use ledgerdesk_core::routes::{resolve, Page, ROUTES};
use ledgerdesk_core::Session;

use super::{lookups, reports, transactions, FilterArgs};

/// Renders the page an application path points at.
pub async fn run(session: &Session, path: &str) -> anyhow::Result<()> {
    let Some(route) = resolve(path) else {
        let known: Vec<&str> = ROUTES.iter().map(|r| r.path).collect();
        anyhow::bail!("Unknown path {}; known paths: {}", path, known.join(", "));
    };
    tracing::debug!("{} -> {:?}", path, route.page);

    match route.page {
        Page::History => transactions::list(session, &FilterArgs::default(), 1).await,
        Page::Companies => lookups::companies(session).await,
        Page::Marks => lookups::marks(session).await,
        Page::Coa => lookups::coa(session).await,
        Page::Reports | Page::Dashboard => reports::all(session).await,
        Page::Products => lookups::products(session).await,
        Page::HppBatches => lookups::batches(session).await,
        Page::Rentals => lookups::rentals(session).await,
        Page::Converter => {
            println!("Use `ledgerdesk convert <file>` to convert a statement.");
            Ok(())
        }
        Page::Amortization => {
            println!("Amortization is managed per company; see `ledgerdesk report` for totals.");
            Ok(())
        }
    }
}
