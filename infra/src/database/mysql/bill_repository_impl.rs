//! MySQL implementation of the BillRepository trait.

use async_trait::async_trait;
use bb_core::domain::entities::{Bill, BillFilter, NewBill};
use bb_core::errors::{DomainError, DomainResult};
use bb_core::repositories::BillRepository;
use bb_shared::Pagination;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlConnection, QueryBuilder};
use tracing::debug;

use super::column;
use crate::InfrastructureError;

const BILL_COLUMNS: &str = "id, shop_id, currency_id, payment_method_id, user_id, created_by, \
     subtotal, discount, total, purchase_date, created_at, updated_at, deleted_at";

/// Bill repository bound to the connection of an open transaction
pub struct MySqlBillRepository<'a> {
    conn: &'a mut MySqlConnection,
}

impl<'a> MySqlBillRepository<'a> {
    pub fn new(conn: &'a mut MySqlConnection) -> Self {
        Self { conn }
    }

    fn row_to_bill(row: &MySqlRow) -> DomainResult<Bill> {
        Ok(Bill {
            id: column(row, "id")?,
            shop_id: column(row, "shop_id")?,
            currency_id: column(row, "currency_id")?,
            payment_method_id: column(row, "payment_method_id")?,
            user_id: column(row, "user_id")?,
            created_by: column(row, "created_by")?,
            subtotal: column(row, "subtotal")?,
            discount: column(row, "discount")?,
            total: column(row, "total")?,
            purchase_date: column(row, "purchase_date")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            deleted_at: column(row, "deleted_at")?,
        })
    }

    /// Appends the filter conditions to a query that already has a WHERE clause
    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &BillFilter) {
        if let Some(user_id) = filter.user_id {
            builder.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(shop_id) = filter.shop_id {
            builder.push(" AND shop_id = ").push_bind(shop_id);
        }
        if let Some(currency_id) = filter.currency_id {
            builder.push(" AND currency_id = ").push_bind(currency_id);
        }
        if let Some(payment_method_id) = filter.payment_method_id {
            builder
                .push(" AND payment_method_id = ")
                .push_bind(payment_method_id);
        }
        if let Some(from) = filter.purchased_from {
            builder.push(" AND purchase_date >= ").push_bind(from);
        }
        if let Some(to) = filter.purchased_to {
            builder.push(" AND purchase_date <= ").push_bind(to);
        }
    }
}

#[async_trait]
impl<'a> BillRepository for MySqlBillRepository<'a> {
    async fn create(&mut self, bill: NewBill) -> DomainResult<Bill> {
        let now = Utc::now();
        let query = r#"
            INSERT INTO bills (
                shop_id, currency_id, payment_method_id, user_id, created_by,
                subtotal, discount, total, purchase_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(bill.shop_id)
            .bind(bill.currency_id)
            .bind(bill.payment_method_id)
            .bind(bill.user_id)
            .bind(bill.created_by)
            .bind(bill.subtotal)
            .bind(bill.discount)
            .bind(bill.total)
            .bind(bill.purchase_date)
            .bind(now)
            .bind(now)
            .execute(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;

        let id = result.last_insert_id() as i64;
        debug!(bill_id = id, "Bill row inserted");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::internal(format!("Inserted bill {} not found", id)))
    }

    async fn find_by_id(&mut self, id: i64) -> DomainResult<Option<Bill>> {
        let query = format!(
            "SELECT {} FROM bills WHERE id = ? AND deleted_at IS NULL LIMIT 1",
            BILL_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;

        row.as_ref().map(Self::row_to_bill).transpose()
    }

    async fn search(
        &mut self,
        filter: &BillFilter,
        pagination: Pagination,
    ) -> DomainResult<(Vec<Bill>, u64)> {
        let mut count = QueryBuilder::<MySql>::new(
            "SELECT COUNT(*) AS total FROM bills WHERE deleted_at IS NULL",
        );
        Self::push_filter(&mut count, filter);
        let row = count
            .build()
            .fetch_one(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;
        let total: i64 = column(&row, "total")?;

        let mut select = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM bills WHERE deleted_at IS NULL",
            BILL_COLUMNS
        ));
        Self::push_filter(&mut select, filter);
        select
            .push(" ORDER BY purchase_date DESC, id DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = select
            .build()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;
        let bills = rows.iter().map(Self::row_to_bill).collect::<DomainResult<Vec<_>>>()?;

        Ok((bills, total.max(0) as u64))
    }

    async fn update(&mut self, bill: &Bill) -> DomainResult<Bill> {
        let query = r#"
            UPDATE bills SET
                shop_id = ?,
                currency_id = ?,
                payment_method_id = ?,
                user_id = ?,
                subtotal = ?,
                discount = ?,
                total = ?,
                purchase_date = ?,
                updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
        "#;

        sqlx::query(query)
            .bind(bill.shop_id)
            .bind(bill.currency_id)
            .bind(bill.payment_method_id)
            .bind(bill.user_id)
            .bind(bill.subtotal)
            .bind(bill.discount)
            .bind(bill.total)
            .bind(bill.purchase_date)
            .bind(bill.updated_at)
            .bind(bill.id)
            .execute(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;

        // MySQL reports zero affected rows for an unchanged row, so re-read instead
        self.find_by_id(bill.id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Bill {}", bill.id)))
    }

    async fn delete(&mut self, id: i64) -> DomainResult<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE bills SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *self.conn)
        .await
        .map_err(InfrastructureError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
