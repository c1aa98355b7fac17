//! Per-session context: one instance of every store, wired to the gateways.
//!
//! A session is created after sign-in and dropped on logout, taking all
//! cached state with it.

use std::sync::Arc;

use crate::amortization::{AmortizationGatewayTrait, AmortizationStore};
use crate::batches::{BatchGatewayTrait, BatchStore};
use crate::coa::{CoaGatewayTrait, CoaStore};
use crate::companies::{CompanyGatewayTrait, CompanyStore};
use crate::constants::{DEFAULT_PAGE_SIZE, HISTORY_VIEW};
use crate::converter::{ConverterGatewayTrait, ConverterStore};
use crate::filters::FilterGatewayTrait;
use crate::marks::{MarkGatewayTrait, MarkStore};
use crate::products::{ProductGatewayTrait, ProductStore};
use crate::reports::{ReportGatewayTrait, ReportsStore};
use crate::rentals::{RentalGatewayTrait, RentalStore};
use crate::transactions::{
    HistoryStore, HistoryStoreDeps, SortConfig, TransactionGatewayTrait, TransactionListView,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub page_size: usize,
    /// Saved-filter key of the history page.
    pub history_view: String,
    pub default_sort: SortConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            history_view: HISTORY_VIEW.to_string(),
            default_sort: SortConfig::default(),
        }
    }
}

/// Every remote call group a session needs.
#[derive(Clone)]
pub struct Gateways {
    pub transactions: Arc<dyn TransactionGatewayTrait>,
    pub companies: Arc<dyn CompanyGatewayTrait>,
    pub marks: Arc<dyn MarkGatewayTrait>,
    pub coa: Arc<dyn CoaGatewayTrait>,
    pub filters: Arc<dyn FilterGatewayTrait>,
    pub reports: Arc<dyn ReportGatewayTrait>,
    pub amortization: Arc<dyn AmortizationGatewayTrait>,
    pub products: Arc<dyn ProductGatewayTrait>,
    pub batches: Arc<dyn BatchGatewayTrait>,
    pub rentals: Arc<dyn RentalGatewayTrait>,
    pub converter: Arc<dyn ConverterGatewayTrait>,
}

impl Gateways {
    /// Uses one client for every call group.
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: TransactionGatewayTrait
            + CompanyGatewayTrait
            + MarkGatewayTrait
            + CoaGatewayTrait
            + FilterGatewayTrait
            + ReportGatewayTrait
            + AmortizationGatewayTrait
            + ProductGatewayTrait
            + BatchGatewayTrait
            + RentalGatewayTrait
            + ConverterGatewayTrait
            + 'static,
    {
        Self {
            transactions: client.clone(),
            companies: client.clone(),
            marks: client.clone(),
            coa: client.clone(),
            filters: client.clone(),
            reports: client.clone(),
            amortization: client.clone(),
            products: client.clone(),
            batches: client.clone(),
            rentals: client.clone(),
            converter: client,
        }
    }
}

pub struct Session {
    config: SessionConfig,
    history: Arc<HistoryStore>,
    companies: Arc<CompanyStore>,
    marks: Arc<MarkStore>,
    coa: Arc<CoaStore>,
    reports: Arc<ReportsStore>,
    amortization: Arc<AmortizationStore>,
    products: Arc<ProductStore>,
    batches: Arc<BatchStore>,
    rentals: Arc<RentalStore>,
    converter: Arc<ConverterStore>,
}

impl Session {
    pub fn new(gateways: Gateways, config: SessionConfig) -> Self {
        let view = TransactionListView::new(config.page_size).with_sort(config.default_sort);
        let history = HistoryStore::new(
            HistoryStoreDeps {
                transactions: gateways.transactions.clone(),
                companies: gateways.companies.clone(),
                marks: gateways.marks.clone(),
                coa: gateways.coa.clone(),
                filters: gateways.filters.clone(),
            },
            &config.history_view,
            view,
        );

        Self {
            history: Arc::new(history),
            companies: Arc::new(CompanyStore::new(gateways.companies)),
            marks: Arc::new(MarkStore::new(gateways.marks, gateways.transactions)),
            coa: Arc::new(CoaStore::new(gateways.coa)),
            reports: Arc::new(ReportsStore::new(
                gateways.reports,
                gateways.amortization.clone(),
                gateways.filters,
            )),
            amortization: Arc::new(AmortizationStore::new(gateways.amortization)),
            products: Arc::new(ProductStore::new(gateways.products)),
            batches: Arc::new(BatchStore::new(gateways.batches)),
            rentals: Arc::new(RentalStore::new(gateways.rentals)),
            converter: Arc::new(ConverterStore::new(gateways.converter)),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> Arc<HistoryStore> {
        Arc::clone(&self.history)
    }

    pub fn companies(&self) -> Arc<CompanyStore> {
        Arc::clone(&self.companies)
    }

    pub fn marks(&self) -> Arc<MarkStore> {
        Arc::clone(&self.marks)
    }

    pub fn coa(&self) -> Arc<CoaStore> {
        Arc::clone(&self.coa)
    }

    pub fn reports(&self) -> Arc<ReportsStore> {
        Arc::clone(&self.reports)
    }

    pub fn amortization(&self) -> Arc<AmortizationStore> {
        Arc::clone(&self.amortization)
    }

    pub fn products(&self) -> Arc<ProductStore> {
        Arc::clone(&self.products)
    }

    pub fn batches(&self) -> Arc<BatchStore> {
        Arc::clone(&self.batches)
    }

    pub fn rentals(&self) -> Arc<RentalStore> {
        Arc::clone(&self.rentals)
    }

    pub fn converter(&self) -> Arc<ConverterStore> {
        Arc::clone(&self.converter)
    }
}
