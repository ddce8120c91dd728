//! In-memory bill store with snapshot transactions.
//!
//! A unit of work copies the committed tables when its transaction begins and
//! works on that copy; commit writes the touched rows back, rollback drops the
//! copy. Identities come from store-wide counters and are never reused, the way
//! auto-increment columns behave.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bb_shared::Pagination;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::{Bill, BillFilter, BillItem, NewBill, NewBillItem};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::bill::{BillItemRepository, BillRepository};
use crate::repositories::unit_of_work::{UnitOfWork, UnitOfWorkFactory, UnitOfWorkState};

#[derive(Debug, Clone, Default)]
struct Tables {
    bills: BTreeMap<i64, Bill>,
    items: BTreeMap<i64, BillItem>,
}

#[derive(Debug, Default)]
struct StoreInner {
    tables: Mutex<Tables>,
    next_bill_id: AtomicI64,
    next_item_id: AtomicI64,
    /// 1-based item write that fails inside every unit of work; 0 disables
    fail_item_write_at: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    releases: AtomicUsize,
}

impl StoreInner {
    fn next_bill_id(&self) -> i64 {
        self.next_bill_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_item_id(&self) -> i64 {
        self.next_item_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Shared in-memory storage for bills and their items
#[derive(Debug, Clone, Default)]
pub struct InMemoryBillStore {
    inner: Arc<StoreInner>,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th item write (create or upsert, 1-based) of every
    /// subsequent unit of work fail with an internal error
    pub fn fail_item_write_at(&self, n: usize) {
        self.inner.fail_item_write_at.store(n, Ordering::SeqCst);
    }

    pub fn clear_failures(&self) {
        self.inner.fail_item_write_at.store(0, Ordering::SeqCst);
    }

    pub fn unit_of_work(&self) -> InMemoryUnitOfWork {
        InMemoryUnitOfWork {
            store: self.clone(),
            working: None,
            state: UnitOfWorkState::Idle,
        }
    }

    /// Every committed bill row, soft-deleted ones included
    pub async fn bills(&self) -> Vec<Bill> {
        self.inner.tables.lock().await.bills.values().cloned().collect()
    }

    /// Every committed item row, soft-deleted ones included
    pub async fn items(&self) -> Vec<BillItem> {
        self.inner.tables.lock().await.items.values().cloned().collect()
    }

    pub fn commit_count(&self) -> usize {
        self.inner.commits.load(Ordering::SeqCst)
    }

    pub fn rollback_count(&self) -> usize {
        self.inner.rollbacks.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.inner.releases.load(Ordering::SeqCst)
    }
}

impl UnitOfWorkFactory for InMemoryBillStore {
    type UnitOfWork = InMemoryUnitOfWork;

    fn create(&self) -> InMemoryUnitOfWork {
        self.unit_of_work()
    }
}

/// Private copy of the tables owned by one transaction
#[derive(Debug)]
struct WorkingSet {
    tables: Tables,
    dirty_bills: BTreeSet<i64>,
    dirty_items: BTreeSet<i64>,
    item_writes: usize,
    fail_item_write_at: Option<usize>,
}

impl WorkingSet {
    fn record_item_write(&mut self) -> DomainResult<()> {
        self.item_writes += 1;
        if self.fail_item_write_at == Some(self.item_writes) {
            return Err(DomainError::internal(format!(
                "simulated failure writing bill item {}",
                self.item_writes
            )));
        }
        Ok(())
    }
}

/// Unit of work over an [`InMemoryBillStore`]
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    store: InMemoryBillStore,
    working: Option<WorkingSet>,
    state: UnitOfWorkState,
}

impl InMemoryUnitOfWork {
    fn working_set(&mut self) -> DomainResult<(&mut WorkingSet, &StoreInner)> {
        self.state.ensure_active()?;
        let inner = &*self.store.inner;
        let working = self
            .working
            .as_mut()
            .ok_or_else(|| DomainError::internal("unit of work is not in a transaction"))?;
        Ok((working, inner))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn begin_transaction(&mut self) -> DomainResult<()> {
        self.state.check_transition(UnitOfWorkState::Active)?;

        let snapshot = self.store.inner.tables.lock().await.clone();
        let fail_at = self.store.inner.fail_item_write_at.load(Ordering::SeqCst);
        self.working = Some(WorkingSet {
            tables: snapshot,
            dirty_bills: BTreeSet::new(),
            dirty_items: BTreeSet::new(),
            item_writes: 0,
            fail_item_write_at: (fail_at > 0).then_some(fail_at),
        });
        self.state = UnitOfWorkState::Active;
        Ok(())
    }

    fn bill_repository(&mut self) -> DomainResult<Box<dyn BillRepository + '_>> {
        let (working, inner) = self.working_set()?;
        Ok(Box::new(MemoryBillRepository { working, inner }))
    }

    fn bill_item_repository(&mut self) -> DomainResult<Box<dyn BillItemRepository + '_>> {
        let (working, inner) = self.working_set()?;
        Ok(Box::new(MemoryBillItemRepository { working, inner }))
    }

    async fn commit(&mut self) -> DomainResult<()> {
        self.state.check_transition(UnitOfWorkState::Committed)?;

        if let Some(working) = self.working.take() {
            let mut tables = self.store.inner.tables.lock().await;
            for id in &working.dirty_bills {
                if let Some(bill) = working.tables.bills.get(id) {
                    tables.bills.insert(*id, bill.clone());
                }
            }
            for id in &working.dirty_items {
                if let Some(item) = working.tables.items.get(id) {
                    tables.items.insert(*id, item.clone());
                }
            }
            debug!(
                bills = working.dirty_bills.len(),
                items = working.dirty_items.len(),
                "In-memory transaction committed"
            );
        }
        self.state = UnitOfWorkState::Committed;
        self.store.inner.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&mut self) -> DomainResult<()> {
        self.state.check_transition(UnitOfWorkState::RolledBack)?;

        self.working = None;
        self.state = UnitOfWorkState::RolledBack;
        self.store.inner.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn release(&mut self) {
        match self.state {
            UnitOfWorkState::Released => return,
            UnitOfWorkState::Active => {
                self.working = None;
                self.store.inner.rollbacks.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
        self.working = None;
        self.state = UnitOfWorkState::Released;
        self.store.inner.releases.fetch_add(1, Ordering::SeqCst);
    }

    fn state(&self) -> UnitOfWorkState {
        self.state
    }
}

struct MemoryBillRepository<'a> {
    working: &'a mut WorkingSet,
    inner: &'a StoreInner,
}

#[async_trait]
impl BillRepository for MemoryBillRepository<'_> {
    async fn create(&mut self, bill: NewBill) -> DomainResult<Bill> {
        let id = self.inner.next_bill_id();
        let bill = Bill::from_new(id, bill);
        self.working.tables.bills.insert(id, bill.clone());
        self.working.dirty_bills.insert(id);
        Ok(bill)
    }

    async fn find_by_id(&mut self, id: i64) -> DomainResult<Option<Bill>> {
        Ok(self
            .working
            .tables
            .bills
            .get(&id)
            .filter(|b| !b.is_deleted())
            .cloned())
    }

    async fn search(
        &mut self,
        filter: &BillFilter,
        pagination: Pagination,
    ) -> DomainResult<(Vec<Bill>, u64)> {
        let mut matches: Vec<&Bill> = self
            .working
            .tables
            .bills
            .values()
            .filter(|b| filter.matches(b))
            .collect();
        matches.sort_by(|a, b| {
            b.purchase_date
                .cmp(&a.purchase_date)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit() as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn update(&mut self, bill: &Bill) -> DomainResult<Bill> {
        let stored = self
            .working
            .tables
            .bills
            .get_mut(&bill.id)
            .filter(|b| !b.is_deleted())
            .ok_or_else(|| DomainError::not_found(format!("Bill {}", bill.id)))?;

        let created_at = stored.created_at;
        *stored = bill.clone();
        stored.created_at = created_at;
        stored.updated_at = Utc::now();
        let updated = stored.clone();
        self.working.dirty_bills.insert(bill.id);
        Ok(updated)
    }

    async fn delete(&mut self, id: i64) -> DomainResult<bool> {
        match self.working.tables.bills.get_mut(&id) {
            Some(bill) if !bill.is_deleted() => {
                let now = Utc::now();
                bill.deleted_at = Some(now);
                bill.updated_at = now;
                self.working.dirty_bills.insert(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

struct MemoryBillItemRepository<'a> {
    working: &'a mut WorkingSet,
    inner: &'a StoreInner,
}

impl MemoryBillItemRepository<'_> {
    fn ensure_bill_exists(&self, bill_id: i64) -> DomainResult<()> {
        if self.working.tables.bills.contains_key(&bill_id) {
            Ok(())
        } else {
            Err(DomainError::internal(format!(
                "foreign key violation: bill {} does not exist",
                bill_id
            )))
        }
    }

    fn find_by_key(&self, bill_id: i64, product_id: i64) -> Option<i64> {
        self.working
            .tables
            .items
            .values()
            .find(|i| i.bill_id == bill_id && i.product_id == product_id)
            .map(|i| i.id)
    }

    fn insert(&mut self, item: NewBillItem) -> BillItem {
        let id = self.inner.next_item_id();
        let now = Utc::now();
        let row = BillItem {
            id,
            bill_id: item.bill_id,
            product_id: item.product_id,
            quantity: item.quantity,
            net_price: item.net_price,
            net_unit: item.net_unit,
            content_value: item.content_value,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.working.tables.items.insert(id, row.clone());
        self.working.dirty_items.insert(id);
        row
    }
}

#[async_trait]
impl BillItemRepository for MemoryBillItemRepository<'_> {
    async fn create(&mut self, item: NewBillItem) -> DomainResult<BillItem> {
        self.working.record_item_write()?;
        self.ensure_bill_exists(item.bill_id)?;

        if self.find_by_key(item.bill_id, item.product_id).is_some() {
            return Err(DomainError::internal(format!(
                "duplicate entry for bill item ({}, {})",
                item.bill_id, item.product_id
            )));
        }
        Ok(self.insert(item))
    }

    async fn upsert(&mut self, item: NewBillItem) -> DomainResult<i64> {
        self.working.record_item_write()?;
        self.ensure_bill_exists(item.bill_id)?;

        let existing = self
            .find_by_key(item.bill_id, item.product_id)
            .and_then(|id| self.working.tables.items.get_mut(&id));

        match existing {
            Some(row) if !row.differs_from(&item) => Ok(row.id),
            Some(row) => {
                row.quantity = item.quantity;
                row.net_price = item.net_price;
                row.net_unit = item.net_unit;
                row.content_value = item.content_value;
                row.deleted_at = None;
                row.updated_at = Utc::now();
                let id = row.id;
                self.working.dirty_items.insert(id);
                Ok(id)
            }
            None => Ok(self.insert(item).id),
        }
    }

    async fn find_by_bill(&mut self, bill_id: i64) -> DomainResult<Vec<BillItem>> {
        Ok(self
            .working
            .tables
            .items
            .values()
            .filter(|i| i.bill_id == bill_id && !i.is_deleted())
            .cloned()
            .collect())
    }

    async fn soft_delete_except(&mut self, bill_id: i64, keep_ids: &[i64]) -> DomainResult<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for item in self.working.tables.items.values_mut() {
            if item.bill_id == bill_id && !item.is_deleted() && !keep_ids.contains(&item.id) {
                item.deleted_at = Some(now);
                item.updated_at = now;
                self.working.dirty_items.insert(item.id);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn soft_delete_by_bill(&mut self, bill_id: i64) -> DomainResult<u64> {
        self.soft_delete_except(bill_id, &[]).await
    }
}
