//! Registry of immutable loan products.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use lendr_common::error::{Entity, LoanError};
use lendr_common::ids::ProductId;
use lendr_common::loan::product::LoanProductConfig;

#[derive(Debug)]
pub struct ProductRegistry {
    products: RwLock<HashMap<ProductId, Arc<LoanProductConfig>>>,
    next_id: AtomicU64,
}

impl Default for ProductRegistry {
    fn default() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl ProductRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `config` and stores it under a new id.
    pub async fn create(&self, config: LoanProductConfig) -> Result<ProductId, LoanError> {
        config.validate().map_err(LoanError::Validation)?;

        let id = ProductId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.products.write().await.insert(id, Arc::new(config));
        Ok(id)
    }

    pub async fn get(&self, id: ProductId) -> Result<Arc<LoanProductConfig>, LoanError> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LoanError::NotFound {
                entity: Entity::Product,
                id: id.get(),
            })
    }
}
