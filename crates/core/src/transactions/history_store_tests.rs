use super::*;
use crate::coa::CoaCategory;
use crate::errors::Error;
use crate::exports::ExportFormat;
use crate::state::StoreStatus;
use crate::test_support::{account, company, mark, txn, MockBackend};
use crate::utils::time_utils::today;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn deps(backend: &Arc<MockBackend>) -> HistoryStoreDeps {
    HistoryStoreDeps {
        transactions: backend.clone(),
        companies: backend.clone(),
        marks: backend.clone(),
        coa: backend.clone(),
        filters: backend.clone(),
    }
}

fn store(backend: &Arc<MockBackend>) -> HistoryStore {
    HistoryStore::new(deps(backend), "history", TransactionListView::default())
}

fn seeded() -> Arc<MockBackend> {
    let backend = MockBackend::with_transactions(vec![
        txn("t1", "2024-01-05", "100", DbCr::Credit),
        txn("t2", "2024-02-10", "40", DbCr::Debit),
        txn("t3", "2023-12-30", "15.5", DbCr::Debit),
    ]);
    *backend.companies.lock().unwrap() = vec![company("c1", "Acme")];
    *backend.marks.lock().unwrap() = vec![mark("m2", "rent"), mark("m1", "Payroll")];
    *backend.coa.lock().unwrap() = vec![account("a1", "5314", CoaCategory::Expense)];
    backend
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_load_data_fills_all_collections() {
    let backend = seeded();
    let store = store(&backend);

    store.load_data().await.unwrap();

    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.companies().len(), 1);
    assert_eq!(store.marks().len(), 2);
    assert_eq!(store.coa().len(), 1);
    assert_eq!(store.status(), StoreStatus::default());
    assert_eq!(store.available_years(), vec!["2024", "2023"]);
}

#[tokio::test]
async fn test_load_failure_commits_nothing() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    backend.transactions.lock().unwrap().clear();
    backend.fail("list_marks");
    let err = store.load_data().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(store.transactions().len(), 3);
    let status = store.status();
    assert!(!status.is_loading);
    assert_eq!(status.error.as_deref(), Some("list_marks rejected"));
}

#[tokio::test]
async fn test_successful_reload_clears_previous_error() {
    let backend = seeded();
    let store = store(&backend);
    backend.fail("list_coa");
    assert!(store.load_data().await.is_err());

    backend.recover("list_coa");
    store.load_data().await.unwrap();

    assert_eq!(store.status().error, None);
}

#[tokio::test]
async fn test_activate_restores_saved_filters_once() {
    let backend = seeded();
    backend
        .filters
        .lock()
        .unwrap()
        .insert("history".into(), json!({"year": "2024", "search": "t1"}));
    let store = store(&backend);

    store.activate().await.unwrap();
    assert_eq!(store.filters().year.as_deref(), Some("2024"));
    assert_eq!(store.filtered().len(), 1);

    backend
        .filters
        .lock()
        .unwrap()
        .insert("history".into(), json!({"year": "2023"}));
    store.activate().await.unwrap();

    assert_eq!(store.filters().year.as_deref(), Some("2024"));
    let loads = backend
        .calls()
        .iter()
        .filter(|c| *c == "load_filters")
        .count();
    assert_eq!(loads, 1);
}

#[tokio::test]
async fn test_activate_survives_filter_load_failure() {
    let backend = seeded();
    backend.fail("load_filters");
    let store = store(&backend);

    store.activate().await.unwrap();

    assert!(store.filters().is_empty());
    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.status().error, None);
}

#[tokio::test]
async fn test_stale_load_is_discarded() {
    let backend = seeded();
    *backend.list_delays.lock().unwrap() = vec![Duration::from_millis(80)];
    let store = Arc::new(store(&backend));

    let slow = {
        let store = store.clone();
        tokio::spawn(async move { store.load_data().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    backend.transactions.lock().unwrap().retain(|t| t.id == "t1");
    store.load_data().await.unwrap();
    slow.await.unwrap().unwrap();

    assert_eq!(store.transactions().len(), 1);
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Filters
// ============================================================================

#[tokio::test]
async fn test_each_filter_change_is_saved_and_resets_page() {
    let backend = seeded();
    let store = HistoryStore::new(deps(&backend), "history", TransactionListView::new(1));
    store.load_data().await.unwrap();
    store.set_page(3);
    assert_eq!(store.current_page(), 3);

    store
        .set_filter(FilterUpdate::Year(Some("2024".into())))
        .await;

    assert_eq!(store.current_page(), 1);
    assert_eq!(store.total_pages(), 2);
    assert_eq!(backend.filter_saves.load(Ordering::SeqCst), 1);
    assert_eq!(
        backend.filters.lock().unwrap()["history"]["year"],
        json!("2024")
    );
}

#[tokio::test]
async fn test_update_filters_saves_once() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    store
        .update_filters(|f| {
            f.date_start = Some("2024-01-01".into());
            f.date_end = Some("2024-01-31".into());
        })
        .await;

    assert_eq!(backend.filter_saves.load(Ordering::SeqCst), 1);
    let ids: Vec<String> = store.filtered().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["t1"]);
}

#[tokio::test]
async fn test_filter_save_failure_keeps_filters_applied() {
    let backend = seeded();
    backend.fail("save_filters");
    let store = store(&backend);
    store.load_data().await.unwrap();

    store
        .set_filter(FilterUpdate::DbCr(Some(DbCr::Debit)))
        .await;

    assert_eq!(store.filtered().len(), 2);
    assert_eq!(store.status().error, None);

    store.reset_filters().await;
    assert_eq!(store.filtered().len(), 3);
}

#[tokio::test]
async fn test_totals_follow_filters() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    let totals = store.filtered_totals();
    assert_eq!(totals.credit, dec!(100));
    assert_eq!(totals.debit, dec!(55.5));
    assert_eq!(totals.net, dec!(44.5));

    store
        .set_filter(FilterUpdate::Year(Some("2023".into())))
        .await;
    assert_eq!(store.filtered_totals().net, dec!(-15.5));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_assign_mark_reloads_from_server() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    store.assign_mark("t2", Some("m1")).await.unwrap();

    let t2 = store
        .transactions()
        .into_iter()
        .find(|t| t.id == "t2")
        .unwrap();
    assert_eq!(t2.mark_id.as_deref(), Some("m1"));
    let calls = backend.calls();
    let assign_at = calls.iter().position(|c| c == "assign_mark").unwrap();
    assert!(calls[assign_at..].contains(&"list_transactions".to_string()));
}

#[tokio::test]
async fn test_failed_mutation_records_error_and_skips_reload() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();
    backend.fail("update_notes");
    let loads_before = backend.list_calls.load(Ordering::SeqCst);

    let result = store.update_notes("t1", "paid in cash").await;

    assert!(result.is_err());
    assert_eq!(
        store.status().error.as_deref(),
        Some("update_notes rejected")
    );
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), loads_before);
}

#[tokio::test]
async fn test_bulk_delete_with_partial_selection() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    store.select_all();
    assert_eq!(store.selected_ids().len(), 3);
    assert!(!store.toggle_selection("t3"));

    store.bulk_delete().await.unwrap();

    assert!(store.selected_ids().is_empty());
    assert_eq!(backend.transaction_ids(), vec!["t3"]);
    let remaining: Vec<String> = store.transactions().into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec!["t3"]);
}

#[tokio::test]
async fn test_bulk_action_without_selection_is_rejected() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    let err = store.bulk_assign_company(Some("c1")).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(store
        .status()
        .error
        .unwrap()
        .contains("No transactions selected"));
    assert!(!backend.calls().contains(&"bulk_assign_company".to_string()));
}

#[tokio::test]
async fn test_bulk_assign_mark_keeps_selection_on_failure() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();
    store.toggle_selection("t1");
    backend.fail("bulk_assign_mark");

    assert!(store.bulk_assign_mark(Some("m2")).await.is_err());
    assert_eq!(store.selected_ids(), vec!["t1"]);

    backend.recover("bulk_assign_mark");
    store.bulk_assign_mark(Some("m2")).await.unwrap();
    assert!(store.selected_ids().is_empty());
    assert_eq!(store.status().error, None);
}

#[tokio::test]
async fn test_delete_transaction_prunes_selection() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();
    store.toggle_selection("t1");
    store.toggle_selection("t2");

    store.delete_transaction("t1").await.unwrap();

    assert_eq!(store.selected_ids(), vec!["t2"]);
}

#[tokio::test]
async fn test_delete_by_source_requires_file() {
    let backend = seeded();
    let store = store(&backend);

    let err = store
        .delete_by_source(DeleteBySourceRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(!backend.calls().contains(&"delete_by_source".to_string()));
}

#[tokio::test]
async fn test_delete_by_source_refreshes_summary() {
    let backend = seeded();
    {
        let mut transactions = backend.transactions.lock().unwrap();
        transactions[0].source_file = Some("jan.pdf".into());
        transactions[1].source_file = Some("feb.pdf".into());
    }
    let store = store(&backend);
    let summary = store.upload_summary().await.unwrap();
    assert_eq!(summary.len(), 2);

    store
        .delete_by_source(DeleteBySourceRequest {
            source_file: "jan.pdf".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let files: Vec<Option<String>> = store
        .upload_summaries()
        .into_iter()
        .map(|s| s.source_file)
        .collect();
    assert_eq!(files, vec![Some("feb.pdf".to_string())]);
    assert_eq!(store.transactions().len(), 2);
}

// ============================================================================
// Export
// ============================================================================

#[tokio::test]
async fn test_export_sends_current_filters() {
    let backend = seeded();
    let store = store(&backend);
    store
        .set_filter(FilterUpdate::Bank(Some("BCA".into())))
        .await;

    let file = store.export(ExportFormat::Csv).await.unwrap();

    assert_eq!(
        file.file_name,
        format!("transactions_{}.csv", today().format("%Y-%m-%d"))
    );
    let exports = backend.exports.lock().unwrap();
    assert_eq!(exports[0].format, ExportFormat::Csv);
    assert_eq!(exports[0].filters.bank.as_deref(), Some("BCA"));
}

#[tokio::test]
async fn test_sorted_marks_are_case_insensitive() {
    let backend = seeded();
    let store = store(&backend);
    store.load_data().await.unwrap();

    let labels: Vec<String> = store
        .sorted_marks()
        .iter()
        .map(|m| m.label().to_string())
        .collect();
    assert_eq!(labels, vec!["Payroll", "rent"]);
}
