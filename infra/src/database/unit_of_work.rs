//! MySQL unit of work owning one SQLx transaction.

use async_trait::async_trait;
use bb_core::errors::{DomainError, DomainResult};
use bb_core::repositories::{BillItemRepository, BillRepository, UnitOfWork, UnitOfWorkState};
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::{debug, warn};

use super::mysql::{MySqlBillItemRepository, MySqlBillRepository};
use crate::InfrastructureError;

/// Unit of work over a pooled MySQL connection
///
/// The connection is acquired on `begin_transaction` and returned to the pool
/// when the transaction ends.
pub struct MySqlUnitOfWork {
    pool: MySqlPool,
    tx: Option<Transaction<'static, MySql>>,
    state: UnitOfWorkState,
}

impl MySqlUnitOfWork {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            tx: None,
            state: UnitOfWorkState::Idle,
        }
    }

    fn transaction(&mut self) -> DomainResult<&mut Transaction<'static, MySql>> {
        self.state.ensure_active()?;
        self.tx
            .as_mut()
            .ok_or_else(|| DomainError::internal("unit of work is not in a transaction"))
    }

    fn take_transaction(&mut self) -> DomainResult<Transaction<'static, MySql>> {
        self.tx
            .take()
            .ok_or_else(|| DomainError::internal("unit of work is not in a transaction"))
    }
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn begin_transaction(&mut self) -> DomainResult<()> {
        self.state.check_transition(UnitOfWorkState::Active)?;
        let tx = self.pool.begin().await.map_err(InfrastructureError::from)?;
        self.tx = Some(tx);
        self.state = UnitOfWorkState::Active;
        debug!("Transaction started");
        Ok(())
    }

    fn bill_repository(&mut self) -> DomainResult<Box<dyn BillRepository + '_>> {
        let tx = self.transaction()?;
        Ok(Box::new(MySqlBillRepository::new(&mut **tx)))
    }

    fn bill_item_repository(&mut self) -> DomainResult<Box<dyn BillItemRepository + '_>> {
        let tx = self.transaction()?;
        Ok(Box::new(MySqlBillItemRepository::new(&mut **tx)))
    }

    async fn commit(&mut self) -> DomainResult<()> {
        self.state.check_transition(UnitOfWorkState::Committed)?;
        let tx = self.take_transaction()?;
        if let Err(e) = tx.commit().await {
            // a failed COMMIT leaves nothing applied
            self.state = UnitOfWorkState::RolledBack;
            return Err(InfrastructureError::from(e).into());
        }
        self.state = UnitOfWorkState::Committed;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> DomainResult<()> {
        self.state.check_transition(UnitOfWorkState::RolledBack)?;
        let tx = self.take_transaction()?;
        self.state = UnitOfWorkState::RolledBack;
        tx.rollback().await.map_err(InfrastructureError::from)?;
        debug!("Transaction rolled back");
        Ok(())
    }

    async fn release(&mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(e) = tx.rollback().await {
                warn!(error = %e, "Rollback on release failed");
            }
        }
        self.state = UnitOfWorkState::Released;
    }

    fn state(&self) -> UnitOfWorkState {
        self.state
    }
}
