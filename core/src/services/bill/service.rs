//! Bill use cases running inside a unit of work

use std::collections::HashSet;
use std::sync::Arc;

use bb_shared::{PaginatedResponse, Pagination};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Bill, BillFilter, BillPatch, BillWithItems, CreateBillInput};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{UnitOfWork, UnitOfWorkFactory};

use super::validation::validate_new_bill;

/// Service for the bill aggregate
///
/// Every call takes a fresh unit of work from the factory. Mutations run as
/// begin -> write... -> commit; any error rolls the transaction back and is
/// returned unchanged, and the unit is released on every exit path.
pub struct BillService<F: UnitOfWorkFactory> {
    uow_factory: Arc<F>,
}

impl<F: UnitOfWorkFactory> BillService<F> {
    pub fn new(uow_factory: Arc<F>) -> Self {
        Self { uow_factory }
    }

    /// Create a bill with its items
    ///
    /// The input is validated inside the transaction before any write. Items
    /// are inserted one by one in input order.
    ///
    /// # Returns
    /// The stored bill header; callers that need the items query them.
    pub async fn create_bill(&self, input: CreateBillInput) -> DomainResult<Bill> {
        let mut uow = self.uow_factory.create();
        let outcome = Self::create_in(&mut uow, input).await;
        Self::finish(&mut uow, outcome).await
    }

    /// Update a bill header and upsert its items
    ///
    /// When the patch carries items, each is stamped with the bill id and
    /// upserted on `(bill_id, product_id)`. If at least one of them names an
    /// existing item id, live items that are neither named nor written by this
    /// update are soft-deleted; otherwise existing items are left alone.
    /// Totals and duplicate products are not re-validated.
    ///
    /// # Returns
    /// The applied patch, items stamped with the bill id
    pub async fn update_bill(&self, id: i64, patch: BillPatch) -> DomainResult<BillPatch> {
        let mut uow = self.uow_factory.create();
        let outcome = Self::update_in(&mut uow, id, patch).await;
        Self::finish(&mut uow, outcome).await
    }

    /// Soft-delete a bill and all of its items
    pub async fn delete_bill(&self, id: i64) -> DomainResult<()> {
        let mut uow = self.uow_factory.create();
        let outcome = Self::delete_in(&mut uow, id).await;
        Self::finish(&mut uow, outcome).await
    }

    /// A live bill with its live items
    pub async fn get_bill(&self, id: i64) -> DomainResult<BillWithItems> {
        let mut uow = self.uow_factory.create();
        let outcome = Self::get_in(&mut uow, id).await;
        uow.release().await;
        outcome
    }

    /// One page of all live bills
    pub async fn list_bills(&self, pagination: Pagination) -> DomainResult<PaginatedResponse<Bill>> {
        self.search_bills(BillFilter::default(), pagination).await
    }

    /// One page of the live bills matching `filter`
    pub async fn search_bills(
        &self,
        filter: BillFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Bill>> {
        let pagination = pagination.validate();
        let mut uow = self.uow_factory.create();
        let outcome = Self::search_in(&mut uow, &filter, pagination).await;
        uow.release().await;

        let (bills, total) = outcome?;
        Ok(PaginatedResponse::new(bills, pagination, total))
    }

    async fn create_in(uow: &mut F::UnitOfWork, input: CreateBillInput) -> DomainResult<Bill> {
        uow.begin_transaction().await?;
        validate_new_bill(&input)?;

        let (header, items) = input.into_parts();
        let item_count = items.len();

        let bill = uow.bill_repository()?.create(header).await?;
        for item in items {
            uow.bill_item_repository()?
                .create(item.into_new_item(bill.id))
                .await?;
        }

        uow.commit().await?;
        info!(bill_id = bill.id, item_count, "Bill created");
        Ok(bill)
    }

    async fn update_in(
        uow: &mut F::UnitOfWork,
        id: i64,
        mut patch: BillPatch,
    ) -> DomainResult<BillPatch> {
        uow.begin_transaction().await?;

        let mut bill = uow
            .bill_repository()?
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Bill {}", id)))?;
        bill.apply_patch(&patch);
        uow.bill_repository()?.update(&bill).await?;

        if let Some(items) = patch.items.as_mut().filter(|items| !items.is_empty()) {
            let live: HashSet<i64> = uow
                .bill_item_repository()?
                .find_by_bill(id)
                .await?
                .into_iter()
                .map(|item| item.id)
                .collect();

            let mut written = Vec::with_capacity(items.len());
            for item in items.iter_mut() {
                item.bill_id = Some(id);
                let item_id = uow
                    .bill_item_repository()?
                    .upsert(item.to_new_item(id))
                    .await?;
                written.push(item_id);
            }

            // Ids that are not live items of this bill never trigger pruning
            let named: Vec<i64> = items
                .iter()
                .filter_map(|item| item.id)
                .filter(|item_id| live.contains(item_id))
                .collect();
            if named.is_empty() {
                debug!(bill_id = id, "Update names no existing items; keeping current items");
            } else {
                let keep: Vec<i64> = named.into_iter().chain(written).collect();
                let pruned = uow
                    .bill_item_repository()?
                    .soft_delete_except(id, &keep)
                    .await?;
                debug!(bill_id = id, pruned, "Pruned items missing from update");
            }
        }

        uow.commit().await?;
        info!(bill_id = id, "Bill updated");
        Ok(patch)
    }

    async fn delete_in(uow: &mut F::UnitOfWork, id: i64) -> DomainResult<()> {
        uow.begin_transaction().await?;

        if !uow.bill_repository()?.delete(id).await? {
            return Err(DomainError::not_found(format!("Bill {}", id)));
        }
        let items = uow.bill_item_repository()?.soft_delete_by_bill(id).await?;

        uow.commit().await?;
        info!(bill_id = id, items, "Bill deleted");
        Ok(())
    }

    async fn get_in(uow: &mut F::UnitOfWork, id: i64) -> DomainResult<BillWithItems> {
        uow.begin_transaction().await?;

        let bill = uow
            .bill_repository()?
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Bill {}", id)))?;
        let items = uow.bill_item_repository()?.find_by_bill(id).await?;
        Ok(BillWithItems { bill, items })
    }

    async fn search_in(
        uow: &mut F::UnitOfWork,
        filter: &BillFilter,
        pagination: Pagination,
    ) -> DomainResult<(Vec<Bill>, u64)> {
        uow.begin_transaction().await?;
        uow.bill_repository()?.search(filter, pagination).await
    }

    /// Roll back on error, then release unconditionally
    async fn finish<T>(uow: &mut F::UnitOfWork, outcome: DomainResult<T>) -> DomainResult<T> {
        if let Err(cause) = &outcome {
            if uow.is_in_transaction() {
                warn!(error = %cause, "Rolling back bill transaction");
                if let Err(rollback_error) = uow.rollback().await {
                    error!(error = %rollback_error, "Rollback failed");
                }
            }
        }
        uow.release().await;
        outcome
    }
}
