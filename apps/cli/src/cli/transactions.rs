use std::path::PathBuf;

use comfy_table::{Cell, CellAlignment, Table};
use ledgerdesk_core::exports::ExportFormat;
use ledgerdesk_core::transactions::{DeleteBySourceRequest, HistoryStore, Totals};
use ledgerdesk_core::Session;

use super::{optional_id, FilterArgs};
use crate::fmt::money;

/// Loads the history page and applies the command-line filters on top of
/// the saved ones.
async fn prepare(session: &Session, filters: &FilterArgs) -> anyhow::Result<()> {
    let history = session.history();
    history.activate().await?;
    if filters.reset {
        history.reset_filters().await;
    }
    if !filters.is_empty() {
        let requested = filters.to_filters();
        history.update_filters(move |current| *current = requested).await;
    }
    Ok(())
}

fn totals_row(table: &mut Table, label: &str, totals: &Totals) {
    table.add_row(vec![
        Cell::new(label),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("DB {}", money(totals.debit))),
        Cell::new(format!("CR {}", money(totals.credit))),
        Cell::new(format!("Net {}", money(totals.net))),
    ]);
}

fn render_page(history: &HistoryStore) -> Table {
    let marks = history.marks();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Bank", "Description", "Amount", "Mark"]);
    for txn in history.paginated() {
        let mark = txn
            .mark_id
            .as_deref()
            .and_then(|id| marks.iter().find(|m| m.id == id))
            .map(|m| m.label().to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&txn.id),
            Cell::new(txn.date()),
            Cell::new(&txn.bank_code),
            Cell::new(&txn.description),
            Cell::new(format!("{} {}", txn.db_cr, money(txn.amount)))
                .set_alignment(CellAlignment::Right),
            Cell::new(mark),
        ]);
    }
    totals_row(&mut table, "Page", &history.page_totals());
    totals_row(&mut table, "Filtered", &history.filtered_totals());
    table
}

pub async fn list(session: &Session, filters: &FilterArgs, page: usize) -> anyhow::Result<()> {
    prepare(session, filters).await?;
    let history = session.history();
    history.set_page(page);
    println!("{}", render_page(&history));
    println!(
        "Page {} of {} ({} matching)",
        history.current_page(),
        history.total_pages(),
        history.filtered().len()
    );
    Ok(())
}

/// Selects every filtered transaction; refuses an empty selection.
async fn select_filtered(session: &Session, filters: &FilterArgs) -> anyhow::Result<usize> {
    prepare(session, filters).await?;
    let history = session.history();
    history.deselect_all();
    history.select_all();
    let selected = history.selected_ids().len();
    if selected == 0 {
        anyhow::bail!("No transactions match the filters");
    }
    Ok(selected)
}

pub async fn bulk_mark(session: &Session, mark: &str, filters: &FilterArgs) -> anyhow::Result<()> {
    let selected = select_filtered(session, filters).await?;
    session.history().bulk_assign_mark(optional_id(mark)).await?;
    println!("Updated the mark of {} transactions", selected);
    Ok(())
}

pub async fn bulk_company(
    session: &Session,
    company: &str,
    filters: &FilterArgs,
) -> anyhow::Result<()> {
    let selected = select_filtered(session, filters).await?;
    session
        .history()
        .bulk_assign_company(optional_id(company))
        .await?;
    println!("Updated the company of {} transactions", selected);
    Ok(())
}

pub async fn bulk_delete(session: &Session, filters: &FilterArgs, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete without --yes");
    }
    let selected = select_filtered(session, filters).await?;
    session.history().bulk_delete().await?;
    println!("Deleted {} transactions", selected);
    Ok(())
}

pub async fn notes(session: &Session, id: &str, notes: &str) -> anyhow::Result<()> {
    let history = session.history();
    history.load_data().await?;
    history.update_notes(id, notes).await?;
    println!("Notes saved");
    Ok(())
}

pub async fn export(
    session: &Session,
    filters: &FilterArgs,
    format: ExportFormat,
    out: PathBuf,
) -> anyhow::Result<()> {
    prepare(session, filters).await?;
    let file = session.history().export(format).await?;
    let path = file.save_to(&out).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub async fn sources(session: &Session) -> anyhow::Result<()> {
    let summaries = session.history().upload_summary().await?;
    let mut table = Table::new();
    table.set_header(vec!["Source file", "Bank", "Company", "Rows", "From", "To", "Debit", "Credit"]);
    for summary in &summaries {
        table.add_row(vec![
            Cell::new(summary.source_file.as_deref().unwrap_or("-")),
            Cell::new(summary.bank_code.as_deref().unwrap_or("-")),
            Cell::new(summary.company_name.as_deref().unwrap_or("-")),
            Cell::new(summary.transaction_count),
            Cell::new(summary.start_date.as_deref().unwrap_or("")),
            Cell::new(summary.end_date.as_deref().unwrap_or("")),
            Cell::new(money(summary.total_debit)),
            Cell::new(money(summary.total_credit)),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn delete_source(
    session: &Session,
    source_file: String,
    bank: Option<String>,
    company: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete without --yes");
    }
    let request = DeleteBySourceRequest {
        source_file,
        bank_code: bank,
        company_id: company,
    };
    session.history().delete_by_source(request).await?;
    println!("Deleted");
    Ok(())
}
