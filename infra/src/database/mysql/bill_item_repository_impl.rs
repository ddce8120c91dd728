//! MySQL implementation of the BillItemRepository trait.

use async_trait::async_trait;
use bb_core::domain::entities::{BillItem, NetUnit, NewBillItem};
use bb_core::errors::{BillError, DomainError, DomainResult};
use bb_core::repositories::BillItemRepository;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlConnection, QueryBuilder};
use tracing::debug;

use super::{column, is_foreign_key_violation, is_unique_violation};
use crate::InfrastructureError;

const ITEM_COLUMNS: &str = "id, bill_id, product_id, quantity, net_price, net_unit, \
     content_value, created_at, updated_at, deleted_at";

/// Bill item repository bound to the connection of an open transaction
pub struct MySqlBillItemRepository<'a> {
    conn: &'a mut MySqlConnection,
}

impl<'a> MySqlBillItemRepository<'a> {
    pub fn new(conn: &'a mut MySqlConnection) -> Self {
        Self { conn }
    }

    fn row_to_item(row: &MySqlRow) -> DomainResult<BillItem> {
        let net_unit: String = column(row, "net_unit")?;
        Ok(BillItem {
            id: column(row, "id")?,
            bill_id: column(row, "bill_id")?,
            product_id: column(row, "product_id")?,
            quantity: column(row, "quantity")?,
            net_price: column(row, "net_price")?,
            net_unit: net_unit.parse::<NetUnit>().map_err(DomainError::internal)?,
            content_value: column(row, "content_value")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            deleted_at: column(row, "deleted_at")?,
        })
    }

    async fn find_by_id(&mut self, id: i64) -> DomainResult<BillItem> {
        let query = format!("SELECT {} FROM bill_items WHERE id = ?", ITEM_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;
        Self::row_to_item(&row)
    }

    /// Row with the same `(bill_id, product_id)` key, deleted or not, locked
    /// for the rest of the transaction
    async fn find_by_key_for_update(
        &mut self,
        bill_id: i64,
        product_id: i64,
    ) -> DomainResult<Option<BillItem>> {
        let query = format!(
            "SELECT {} FROM bill_items WHERE bill_id = ? AND product_id = ? FOR UPDATE",
            ITEM_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(bill_id)
            .bind(product_id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;
        row.as_ref().map(Self::row_to_item).transpose()
    }

    fn map_write_error(err: sqlx::Error, item: &NewBillItem) -> DomainError {
        if is_unique_violation(&err) {
            BillError::DuplicateProduct {
                product_id: item.product_id,
            }
            .into()
        } else if is_foreign_key_violation(&err) {
            DomainError::not_found(format!("Bill {}", item.bill_id))
        } else {
            InfrastructureError::from(err).into()
        }
    }
}

#[async_trait]
impl<'a> BillItemRepository for MySqlBillItemRepository<'a> {
    async fn create(&mut self, item: NewBillItem) -> DomainResult<BillItem> {
        let now = Utc::now();
        let query = r#"
            INSERT INTO bill_items (
                bill_id, product_id, quantity, net_price, net_unit, content_value,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(item.bill_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.net_price)
            .bind(item.net_unit.as_str())
            .bind(item.content_value)
            .bind(now)
            .bind(now)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| Self::map_write_error(e, &item))?;

        self.find_by_id(result.last_insert_id() as i64).await
    }

    async fn upsert(&mut self, item: NewBillItem) -> DomainResult<i64> {
        let existing = self
            .find_by_key_for_update(item.bill_id, item.product_id)
            .await?;

        match existing {
            Some(row) if !row.differs_from(&item) => {
                debug!(item_id = row.id, "Bill item unchanged");
                Ok(row.id)
            }
            Some(row) => {
                let query = r#"
                    UPDATE bill_items SET
                        quantity = ?,
                        net_price = ?,
                        net_unit = ?,
                        content_value = ?,
                        updated_at = ?,
                        deleted_at = NULL
                    WHERE id = ?
                "#;
                sqlx::query(query)
                    .bind(item.quantity)
                    .bind(item.net_price)
                    .bind(item.net_unit.as_str())
                    .bind(item.content_value)
                    .bind(Utc::now())
                    .bind(row.id)
                    .execute(&mut *self.conn)
                    .await
                    .map_err(|e| Self::map_write_error(e, &item))?;
                Ok(row.id)
            }
            None => Ok(self.create(item).await?.id),
        }
    }

    async fn find_by_bill(&mut self, bill_id: i64) -> DomainResult<Vec<BillItem>> {
        let query = format!(
            "SELECT {} FROM bill_items WHERE bill_id = ? AND deleted_at IS NULL ORDER BY id",
            ITEM_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(bill_id)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;
        rows.iter().map(Self::row_to_item).collect()
    }

    async fn soft_delete_except(&mut self, bill_id: i64, keep_ids: &[i64]) -> DomainResult<u64> {
        let now = Utc::now();
        let mut builder = QueryBuilder::<MySql>::new("UPDATE bill_items SET deleted_at = ");
        builder
            .push_bind(now)
            .push(", updated_at = ")
            .push_bind(now)
            .push(" WHERE bill_id = ")
            .push_bind(bill_id)
            .push(" AND deleted_at IS NULL");

        if !keep_ids.is_empty() {
            builder.push(" AND id NOT IN (");
            let mut ids = builder.separated(", ");
            for id in keep_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");
        }

        let result = builder
            .build()
            .execute(&mut *self.conn)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(result.rows_affected())
    }

    async fn soft_delete_by_bill(&mut self, bill_id: i64) -> DomainResult<u64> {
        self.soft_delete_except(bill_id, &[]).await
    }
}
