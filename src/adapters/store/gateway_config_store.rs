//! Gateway settings reader over the document store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::payment::{GatewayConfig, PaymentError};
use crate::ports::{DocumentStore, GatewayConfigReader};

pub const SETTINGS_COLLECTION: &str = "settings";
pub const GATEWAY_SETTINGS_DOCUMENT: &str = "paymentGateways";

/// Reads `settings/paymentGateways` on every call.
#[derive(Clone)]
pub struct DocumentGatewayConfigReader {
    store: Arc<dyn DocumentStore>,
}

impl DocumentGatewayConfigReader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GatewayConfigReader for DocumentGatewayConfigReader {
    async fn load(&self) -> Result<Option<GatewayConfig>, PaymentError> {
        let doc = self
            .store
            .get(SETTINGS_COLLECTION, GATEWAY_SETTINGS_DOCUMENT)
            .await?;
        Ok(doc.map(|doc| doc.into_typed::<GatewayConfig>()).transpose()?)
    }
}
