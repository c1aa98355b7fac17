use super::*;
use crate::errors::Error;
use crate::test_support::MockAmortizationGateway;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;

fn group(id: &str, asset_type: AssetType) -> AssetGroup {
    AssetGroup {
        id: id.into(),
        group_name: format!("Kelompok {}", id),
        group_number: Some(id.into()),
        asset_type,
        tarif_rate: Some(dec!(25)),
        tarif_half_rate: Some(dec!(12.5)),
        useful_life_years: Some(dec!(4)),
        company_id: None,
    }
}

fn calculation(asset_id: &str, annual: rust_decimal::Decimal) -> AmortizationCalculation {
    AmortizationCalculation {
        asset_id: Some(asset_id.into()),
        asset_name: None,
        asset_type: None,
        acquisition_cost: dec!(0),
        annual_amortization: annual,
        accumulated_depreciation_prev_year: dec!(0),
        book_value_end_year: dec!(0),
    }
}

fn item_input() -> AmortizationItemInput {
    AmortizationItemInput {
        company_id: "c1".into(),
        year: 2024,
        description: "Laptop".into(),
        amount: dec!(12000000),
        amortization_date: "2024-03-01".into(),
        is_manual: true,
        ..Default::default()
    }
}

fn setup() -> (Arc<MockAmortizationGateway>, AmortizationStore) {
    let gateway = Arc::new(MockAmortizationGateway::default());
    let store = AmortizationStore::new(gateway.clone());
    (gateway, store)
}

#[tokio::test]
async fn test_asset_groups_are_bucketed_by_type() {
    let (gateway, store) = setup();
    *gateway.groups.lock().unwrap() = vec![
        group("1", AssetType::Tangible),
        group("2", AssetType::Intangible),
        group("3", AssetType::Building),
        group("4", AssetType::Tangible),
    ];

    store.fetch_asset_groups(Some("c1"), None).await.unwrap();

    let grouped = store.grouped_asset_groups();
    assert_eq!(grouped.tangible.len(), 2);
    assert_eq!(grouped.intangible.len(), 1);
    assert_eq!(grouped.building.len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_records_error() {
    let (gateway, store) = setup();
    *gateway.offline.lock().unwrap() = true;

    assert!(store.fetch_assets("c1").await.is_err());

    let status = store.status();
    assert!(!status.is_loading);
    assert_eq!(status.error.as_deref(), Some("Failed to fetch assets"));
}

#[tokio::test]
async fn test_calculation_total() {
    let (gateway, store) = setup();
    *gateway.calculations.lock().unwrap() =
        vec![calculation("a1", dec!(1250000)), calculation("a2", dec!(750000.5))];

    store.calculate_amortization("c1", 2024).await.unwrap();

    assert_eq!(store.calculations().len(), 2);
    assert_eq!(store.total_amortization(), dec!(2000000.5));
}

#[tokio::test]
async fn test_auxiliary_reads_fall_back_when_offline() {
    let (gateway, store) = setup();
    *gateway.offline.lock().unwrap() = true;

    assert!(store.fetch_settings(Some("c1")).await.is_empty());
    assert_eq!(store.fetch_coa_codes(None).await.coa_codes, vec!["5314"]);
    let marks = store.fetch_mark_settings(None).await;
    assert!(!marks.settings.use_mark_based_amortization);
    assert_eq!(marks.settings.amortization_asset_marks.len(), 3);
    assert_eq!(marks.settings.default_amortization_rate, "20.00");
    assert!(store.fetch_eligible_marks("c1").await.is_empty());

    assert_eq!(store.status().error, None);
}

#[tokio::test]
async fn test_auxiliary_reads_when_online() {
    let (_gateway, store) = setup();

    assert_eq!(store.fetch_settings(None).await["allow_partial_year"], json!(true));
    assert_eq!(store.settings().len(), 1);
    assert_eq!(store.fetch_coa_codes(None).await.coa_codes.len(), 2);
    let eligible = store.fetch_eligible_marks("c1").await;
    assert_eq!(eligible[0].asset_type, AssetType::Building);
}

#[tokio::test]
async fn test_item_validation_happens_before_the_call() {
    let (gateway, store) = setup();
    let mut input = item_input();
    input.description = " ".into();

    let err = store.create_item(input).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(gateway.calls.lock().unwrap().is_empty());
    assert!(store.status().error.is_some());
}

#[tokio::test]
async fn test_item_crud_passes_through() {
    let (gateway, store) = setup();

    let ack = store.create_item(item_input()).await.unwrap();
    assert_eq!(ack.id.as_deref(), Some("i1"));
    store.update_item("i1", item_input()).await.unwrap();
    store.delete_item("i1").await.unwrap();

    assert_eq!(
        *gateway.calls.lock().unwrap(),
        vec!["create_item", "update_item", "delete_item"]
    );
}

#[tokio::test]
async fn test_delete_asset_removes_it_locally() {
    let (gateway, store) = setup();
    *gateway.assets.lock().unwrap() = vec![serde_json::from_value(json!({
        "id": 9,
        "asset_name": "Delivery van",
        "acquisition_cost": "250,000,000",
        "use_half_rate": 0
    }))
    .unwrap()];
    store.fetch_assets("c1").await.unwrap();
    assert_eq!(store.assets()[0].acquisition_cost, dec!(250000000));

    store.delete_asset("9").await.unwrap();

    assert!(store.assets().is_empty());
}

#[tokio::test]
async fn test_mark_mapping_requires_mark() {
    let (gateway, store) = setup();

    let result = store
        .create_mark_mapping(MarkAmortizationMapping::default())
        .await;

    assert!(result.is_err());
    assert!(gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_journals_reports_count() {
    let (_gateway, store) = setup();

    let generated = store.generate_journals("c1", 2024).await.unwrap();

    assert_eq!(generated.journal_count, 2);
    assert!(!store.status().is_loading);
}
