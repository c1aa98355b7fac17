use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::filters_traits::FilterGatewayTrait;

/// Typed round-trip of one view's filter state.
///
/// Both directions are auxiliary: a failed load yields `None` and a failed
/// save is logged, neither blocks the page. Saves are issued in call order.
pub struct FilterPersistence<F> {
    gateway: Arc<dyn FilterGatewayTrait>,
    view_name: String,
    saves: Mutex<()>,
    _filters: PhantomData<fn() -> F>,
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl<F> FilterPersistence<F>
where
    F: Serialize + DeserializeOwned,
{
    pub fn new(gateway: Arc<dyn FilterGatewayTrait>, view_name: impl Into<String>) -> Self {
        Self {
            gateway,
            view_name: view_name.into(),
            saves: Mutex::new(()),
            _filters: PhantomData,
        }
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    /// The saved filters, or `None` when nothing usable is stored.
    pub async fn load(&self) -> Option<F> {
        let raw = self.load_raw().await;
        if is_blank(&raw) {
            return None;
        }
        match serde_json::from_value(raw) {
            Ok(filters) => Some(filters),
            Err(e) => {
                warn!("Ignoring unreadable {} filters: {}", self.view_name, e);
                None
            }
        }
    }

    /// The stored blob as-is; `{}` on failure.
    pub async fn load_raw(&self) -> Value {
        match self.gateway.load_filters(&self.view_name).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to load {} filters: {}", self.view_name, e);
                Value::Object(Default::default())
            }
        }
    }

    pub async fn save(&self, filters: &F) {
        let value = match serde_json::to_value(filters) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to encode {} filters: {}", self.view_name, e);
                return;
            }
        };
        let _order = self.saves.lock().await;
        match self.gateway.save_filters(&self.view_name, &value).await {
            Ok(_) => debug!("Saved {} filters", self.view_name),
            Err(e) => warn!("Failed to save {} filters: {}", self.view_name, e),
        }
    }
}
