use comfy_table::{Cell, Table};
use ledgerdesk_core::coa::CoaCategory;
use ledgerdesk_core::Session;

use crate::fmt::money;

pub async fn companies(session: &Session) -> anyhow::Result<()> {
    let store = session.companies();
    store.fetch_companies().await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Short name"]);
    for company in store.companies() {
        table.add_row(vec![
            Cell::new(&company.id),
            Cell::new(&company.name),
            Cell::new(company.short_name.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn marks(session: &Session) -> anyhow::Result<()> {
    let store = session.marks();
    store.fetch_marks().await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Label", "Internal report", "Tax report", "Flags"]);
    for mark in store.sorted_marks() {
        let flags: Vec<&str> = [
            (mark.is_asset, "asset"),
            (mark.is_service, "service"),
            (mark.is_salary, "salary"),
            (mark.is_tax, "tax"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        table.add_row(vec![
            Cell::new(&mark.id),
            Cell::new(mark.label()),
            Cell::new(mark.internal_report.as_deref().unwrap_or("")),
            Cell::new(mark.tax_report.as_deref().unwrap_or("")),
            Cell::new(flags.join(", ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn coa(session: &Session) -> anyhow::Result<()> {
    let store = session.coa();
    store.fetch_coa().await?;
    let groups = store.coa_by_category();
    let categories = [
        CoaCategory::Asset,
        CoaCategory::Liability,
        CoaCategory::Equity,
        CoaCategory::Revenue,
        CoaCategory::Expense,
    ];
    let mut table = Table::new();
    table.set_header(vec!["Category", "Account", "Active"]);
    for category in &categories {
        for account in groups.bucket(category) {
            table.add_row(vec![
                Cell::new(category.as_str()),
                Cell::new(account.label()),
                Cell::new(if account.is_active { "yes" } else { "no" }),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

pub async fn products(session: &Session) -> anyhow::Result<()> {
    let store = session.products();
    store.fetch_products(None).await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Code", "Name", "Currency", "Default price"]);
    for product in store.products() {
        table.add_row(vec![
            Cell::new(&product.id),
            Cell::new(product.code.as_deref().unwrap_or("")),
            Cell::new(&product.name),
            Cell::new(product.default_currency.as_deref().unwrap_or("")),
            Cell::new(money(product.default_price)),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn batches(session: &Session) -> anyhow::Result<()> {
    let store = session.batches();
    store.fetch_batches(None).await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Memo", "Transactions", "Total"]);
    for batch in store.batches() {
        table.add_row(vec![
            Cell::new(&batch.id),
            Cell::new(batch.batch_date.as_deref().unwrap_or("")),
            Cell::new(batch.memo.as_deref().unwrap_or("")),
            Cell::new(batch.txn_count),
            Cell::new(money(batch.total_amount)),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn rentals(session: &Session) -> anyhow::Result<()> {
    let store = session.rentals();
    store.fetch_contracts(None, None).await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Contract", "Landlord", "Start", "End", "Status"]);
    for contract in store.contracts() {
        table.add_row(vec![
            Cell::new(&contract.id),
            Cell::new(contract.contract_number.as_deref().unwrap_or("")),
            Cell::new(contract.landlord_name.as_deref().unwrap_or("")),
            Cell::new(&contract.start_date),
            Cell::new(&contract.end_date),
            Cell::new(&contract.status),
        ]);
    }
    println!("{table}");
    Ok(())
}
