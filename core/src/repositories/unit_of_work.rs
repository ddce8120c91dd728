//! Unit of work: one transaction shared by the bill repositories.

use std::fmt;

use async_trait::async_trait;

use crate::errors::{DomainError, DomainResult};

use super::bill::{BillItemRepository, BillRepository};

/// Lifecycle of a unit of work
///
/// `Idle -> Active -> Committed | RolledBack -> Released`. Releasing is allowed
/// from every state and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOfWorkState {
    Idle,
    Active,
    Committed,
    RolledBack,
    Released,
}

impl UnitOfWorkState {
    /// Check that moving to `next` is a legal transition
    pub fn check_transition(self, next: UnitOfWorkState) -> DomainResult<()> {
        use UnitOfWorkState::*;

        let allowed = matches!(
            (self, next),
            (Idle, Active) | (Active, Committed) | (Active, RolledBack) | (_, Released)
        );
        if allowed {
            Ok(())
        } else {
            Err(DomainError::internal(format!(
                "invalid unit of work transition from {} to {}",
                self, next
            )))
        }
    }

    /// Fails unless a transaction is open
    pub fn ensure_active(self) -> DomainResult<()> {
        if self == UnitOfWorkState::Active {
            Ok(())
        } else {
            Err(DomainError::internal("unit of work is not in a transaction"))
        }
    }
}

impl fmt::Display for UnitOfWorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitOfWorkState::Idle => "idle",
            UnitOfWorkState::Active => "active",
            UnitOfWorkState::Committed => "committed",
            UnitOfWorkState::RolledBack => "rolled back",
            UnitOfWorkState::Released => "released",
        };
        f.write_str(name)
    }
}

/// Transactional scope over the bill repositories
///
/// A unit is owned by exactly one workflow invocation. Repository handles
/// borrow the unit mutably and are only handed out while a transaction is open.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Open the transaction (`Idle -> Active`)
    async fn begin_transaction(&mut self) -> DomainResult<()>;

    /// Bill repository bound to the open transaction
    fn bill_repository(&mut self) -> DomainResult<Box<dyn BillRepository + '_>>;

    /// Bill item repository bound to the open transaction
    fn bill_item_repository(&mut self) -> DomainResult<Box<dyn BillItemRepository + '_>>;

    /// Make every change of the transaction durable (`Active -> Committed`)
    async fn commit(&mut self) -> DomainResult<()>;

    /// Discard every change of the transaction (`Active -> RolledBack`)
    async fn rollback(&mut self) -> DomainResult<()>;

    /// Free the underlying resources. Idempotent; an open transaction is rolled back.
    async fn release(&mut self);

    fn state(&self) -> UnitOfWorkState;

    /// True between `begin_transaction` and `commit`/`rollback`
    fn is_in_transaction(&self) -> bool {
        self.state() == UnitOfWorkState::Active
    }
}

/// Produces a fresh unit of work per workflow invocation
pub trait UnitOfWorkFactory: Send + Sync {
    type UnitOfWork: UnitOfWork;

    fn create(&self) -> Self::UnitOfWork;
}

impl<F, U> UnitOfWorkFactory for F
where
    F: Fn() -> U + Send + Sync,
    U: UnitOfWork,
{
    type UnitOfWork = U;

    fn create(&self) -> U {
        self()
    }
}
