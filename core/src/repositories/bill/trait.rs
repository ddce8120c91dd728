//! Repository traits for the bill aggregate.
//!
//! Both repositories are handed out by a [`UnitOfWork`](crate::repositories::UnitOfWork)
//! and operate on its transaction, so every method takes `&mut self`: calls through one
//! unit are sequential by construction.

use async_trait::async_trait;
use bb_shared::Pagination;

use crate::domain::entities::{Bill, BillFilter, BillItem, NewBill, NewBillItem};
use crate::errors::DomainResult;

/// Repository trait for bill headers
///
/// Soft-deleted bills are invisible to every read method.
#[async_trait]
pub trait BillRepository: Send {
    /// Insert a bill header and return it with its assigned identity
    async fn create(&mut self, bill: NewBill) -> DomainResult<Bill>;

    /// Find a live bill by its identity
    async fn find_by_id(&mut self, id: i64) -> DomainResult<Option<Bill>>;

    /// Search live bills, returning one page ordered by purchase date (newest
    /// first) together with the total number of matches
    async fn search(
        &mut self,
        filter: &BillFilter,
        pagination: Pagination,
    ) -> DomainResult<(Vec<Bill>, u64)>;

    /// One page of all live bills
    async fn find_all(&mut self, pagination: Pagination) -> DomainResult<(Vec<Bill>, u64)> {
        self.search(&BillFilter::default(), pagination).await
    }

    /// Persist the header fields of an existing bill
    ///
    /// # Returns
    /// * `Ok(Bill)` - The stored row after the update
    /// * `Err(DomainError::NotFound)` - No live bill with this identity
    async fn update(&mut self, bill: &Bill) -> DomainResult<Bill>;

    /// Soft-delete a bill header
    ///
    /// # Returns
    /// * `Ok(true)` - The bill was marked deleted
    /// * `Ok(false)` - No live bill with this identity
    async fn delete(&mut self, id: i64) -> DomainResult<bool>;
}

/// Repository trait for bill items
#[async_trait]
pub trait BillItemRepository: Send {
    /// Insert an item row for an existing bill
    async fn create(&mut self, item: NewBillItem) -> DomainResult<BillItem>;

    /// Insert or update the item keyed on `(bill_id, product_id)`
    ///
    /// Writing values identical to the stored row leaves it untouched, including
    /// its update timestamp. A soft-deleted row with the same key is revived.
    ///
    /// # Returns
    /// The identity of the inserted or updated row
    async fn upsert(&mut self, item: NewBillItem) -> DomainResult<i64>;

    /// Live items of a bill, in identity order
    async fn find_by_bill(&mut self, bill_id: i64) -> DomainResult<Vec<BillItem>>;

    /// Soft-delete the live items of a bill whose identity is not in `keep_ids`
    ///
    /// # Returns
    /// Number of rows marked deleted
    async fn soft_delete_except(&mut self, bill_id: i64, keep_ids: &[i64]) -> DomainResult<u64>;

    /// Soft-delete every live item of a bill
    async fn soft_delete_by_bill(&mut self, bill_id: i64) -> DomainResult<u64>;
}
