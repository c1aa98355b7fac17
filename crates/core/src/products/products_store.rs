use log::debug;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::products_model::{Product, ProductInput};
use super::products_traits::ProductGatewayTrait;
use crate::errors::Result;
use crate::state::{read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};

/// Product catalogue of one company.
///
/// Every mutation refetches the list for the company it touched.
pub struct ProductStore {
    gateway: Arc<dyn ProductGatewayTrait>,
    products: RwLock<Vec<Product>>,
    status: StatusCell,
    loads: RequestSequence,
    mutations: Mutex<()>,
}

impl ProductStore {
    pub fn new(gateway: Arc<dyn ProductGatewayTrait>) -> Self {
        Self {
            gateway,
            products: RwLock::new(Vec::new()),
            status: StatusCell::default(),
            loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn products(&self) -> Vec<Product> {
        read_lock(&self.products).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub async fn fetch_products(&self, company_id: Option<&str>) -> Result<()> {
        let _loading = self.status.begin();
        let token = self.loads.issue();
        let products = self
            .gateway
            .list_products(company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch products"))?;
        if self.loads.is_latest(token) {
            debug!("Loaded {} products", products.len());
            *write_lock(&self.products) = products;
            self.status.clear_error();
        }
        Ok(())
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<()> {
        const FAILED: &str = "Failed to create product";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input.validate().map_err(|e| self.status.fail(e, FAILED))?;
        self.gateway
            .create_product(&input)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.fetch_products(input.company_id.as_deref()).await
    }

    pub async fn update_product(&self, product_id: &str, input: ProductInput) -> Result<()> {
        const FAILED: &str = "Failed to update product";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        input.validate().map_err(|e| self.status.fail(e, FAILED))?;
        self.gateway
            .update_product(product_id, &input)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        self.fetch_products(input.company_id.as_deref()).await
    }

    pub async fn delete_product(&self, product_id: &str, company_id: Option<&str>) -> Result<()> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .delete_product(product_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to delete product"))?;
        self.fetch_products(company_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::shared::Ack;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct MockProductGateway {
        products: StdMutex<Vec<Product>>,
        listed_for: StdMutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl ProductGatewayTrait for MockProductGateway {
        async fn list_products(&self, company_id: Option<&str>) -> Result<Vec<Product>> {
            self.listed_for
                .lock()
                .unwrap()
                .push(company_id.map(str::to_string));
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .filter(|p| company_id.is_none() || p.company_id.as_deref() == company_id)
                .cloned()
                .collect())
        }

        async fn create_product(&self, input: &ProductInput) -> Result<Ack> {
            let mut products = self.products.lock().unwrap();
            let id = format!("p{}", products.len() + 1);
            products.push(Product {
                id: id.clone(),
                company_id: input.company_id.clone(),
                code: input.code.clone(),
                name: input.name.clone(),
                category: input.category.clone(),
                default_currency: Some(
                    input.default_currency.clone().unwrap_or_else(|| "USD".into()),
                ),
                default_price: input.default_price,
            });
            Ok(Ack {
                id: Some(id),
                ..Default::default()
            })
        }

        async fn update_product(&self, product_id: &str, input: &ProductInput) -> Result<Ack> {
            let mut products = self.products.lock().unwrap();
            let found = products
                .iter_mut()
                .find(|p| p.id == product_id)
                .ok_or_else(|| Error::api(404, Some("Product not found".into())))?;
            found.name = input.name.clone();
            found.default_price = input.default_price;
            Ok(Ack::default())
        }

        async fn delete_product(&self, product_id: &str) -> Result<Ack> {
            self.products.lock().unwrap().retain(|p| p.id != product_id);
            Ok(Ack::default())
        }
    }

    fn input(company: &str, name: &str) -> ProductInput {
        ProductInput {
            company_id: Some(company.into()),
            name: name.into(),
            default_price: dec!(12.5),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_refetches_for_the_company() {
        let gateway = Arc::new(MockProductGateway::default());
        let store = ProductStore::new(gateway.clone());

        store.create_product(input("c1", "Green tea")).await.unwrap();
        store.create_product(input("c2", "Oolong")).await.unwrap();

        let names: Vec<String> = store.products().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Oolong"]);
        assert_eq!(
            *gateway.listed_for.lock().unwrap(),
            vec![Some("c1".to_string()), Some("c2".to_string())]
        );
        assert_eq!(store.products()[0].default_currency.as_deref(), Some("USD"));
    }

    #[tokio::test]
    async fn test_name_is_required() {
        let gateway = Arc::new(MockProductGateway::default());
        let store = ProductStore::new(gateway.clone());

        let err = store.create_product(input("c1", "  ")).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(gateway.products.lock().unwrap().is_empty());
        assert!(store.status().error.is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_product_surfaces_server_message() {
        let gateway = Arc::new(MockProductGateway::default());
        let store = ProductStore::new(gateway);

        assert!(store.update_product("p9", input("c1", "Matcha")).await.is_err());

        assert_eq!(store.status().error.as_deref(), Some("Product not found"));
        assert!(!store.status().is_loading);
    }

    #[tokio::test]
    async fn test_delete_refetches() {
        let gateway = Arc::new(MockProductGateway::default());
        let store = ProductStore::new(gateway);
        store.create_product(input("c1", "Green tea")).await.unwrap();

        store.delete_product("p1", Some("c1")).await.unwrap();

        assert!(store.products().is_empty());
    }
}
