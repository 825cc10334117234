//! # Loan Store
//!
//! In-memory home of the loan aggregates.
//!
//! Each aggregate sits behind its own mutex, so loans never contend with each other. The
//! mutex is held only for a read or a compare-and-set; everything in between (validation,
//! calendar lookups) runs on a detached snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};

use lendr_common::error::{Entity, LoanError};
use lendr_common::ids::LoanId;
use lendr_common::loan::application::LoanApplication;

#[derive(Debug)]
pub struct LoanStore {
    loans: RwLock<HashMap<LoanId, Arc<Mutex<LoanApplication>>>>,
    next_id: AtomicU64,
}

impl Default for LoanStore {
    fn default() -> Self {
        Self {
            loans: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl LoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves an id for a loan about to be inserted.
    pub fn next_id(&self) -> LoanId {
        LoanId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub async fn insert(&self, loan: LoanApplication) {
        self.loans
            .write()
            .await
            .insert(loan.id, Arc::new(Mutex::new(loan)));
    }

    /// A detached copy of the current state of loan `id`.
    pub async fn snapshot(&self, id: LoanId) -> Result<LoanApplication, LoanError> {
        let cell: Arc<Mutex<LoanApplication>> = self.cell(id).await?;
        let loan = cell.lock().await;
        Ok(loan.clone())
    }

    /// Replaces loan `updated.id` with `updated` if its stored version is still `expected`.
    pub async fn compare_and_set(
        &self,
        updated: LoanApplication,
        expected: u64,
    ) -> Result<LoanApplication, LoanError> {
        let cell: Arc<Mutex<LoanApplication>> = self.cell(updated.id).await?;
        let mut current = cell.lock().await;

        if current.version != expected {
            return Err(LoanError::ConcurrencyConflict {
                loan_id: updated.id,
                expected,
                found: current.version,
            });
        }

        *current = updated;
        Ok(current.clone())
    }

    pub async fn len(&self) -> usize {
        self.loans.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.loans.read().await.is_empty()
    }

    async fn cell(&self, id: LoanId) -> Result<Arc<Mutex<LoanApplication>>, LoanError> {
        self.loans
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LoanError::NotFound {
                entity: Entity::Loan,
                id: id.get(),
            })
    }
}
