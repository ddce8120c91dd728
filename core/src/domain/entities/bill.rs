//! Bill aggregate root and the inputs of its write workflows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bill_item::{BillItem, BillItemInput, BillItemPatch};

/// Persisted bill header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Server-assigned identifier
    pub id: i64,
    pub shop_id: i64,
    pub currency_id: i64,
    pub payment_method_id: i64,
    /// Owner of the bill
    pub user_id: i64,
    /// User who recorded the bill
    pub created_by: i64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Bill {
    /// Builds a bill from a header that has just been assigned an identity
    pub fn from_new(id: i64, header: NewBill) -> Self {
        let now = Utc::now();
        Self {
            id,
            shop_id: header.shop_id,
            currency_id: header.currency_id,
            payment_method_id: header.payment_method_id,
            user_id: header.user_id,
            created_by: header.created_by,
            subtotal: header.subtotal,
            discount: header.discount,
            total: header.total,
            purchase_date: header.purchase_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Merges the header fields present in `patch`
    pub fn apply_patch(&mut self, patch: &BillPatch) {
        if let Some(shop_id) = patch.shop_id {
            self.shop_id = shop_id;
        }
        if let Some(currency_id) = patch.currency_id {
            self.currency_id = currency_id;
        }
        if let Some(payment_method_id) = patch.payment_method_id {
            self.payment_method_id = payment_method_id;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(subtotal) = patch.subtotal {
            self.subtotal = subtotal;
        }
        if let Some(discount) = patch.discount {
            self.discount = discount;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
        if let Some(purchase_date) = patch.purchase_date {
            self.purchase_date = purchase_date;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Bill header without identity, as written by the create workflow
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub shop_id: i64,
    pub currency_id: i64,
    pub payment_method_id: i64,
    pub user_id: i64,
    pub created_by: i64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub purchase_date: NaiveDate,
}

/// Input of the create workflow: header fields plus item specifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBillInput {
    pub shop_id: i64,
    pub currency_id: i64,
    pub payment_method_id: i64,
    pub user_id: i64,
    pub created_by: i64,
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
    pub purchase_date: NaiveDate,
    pub items: Vec<BillItemInput>,
}

impl CreateBillInput {
    /// Splits the input into the header and its items
    pub fn into_parts(self) -> (NewBill, Vec<BillItemInput>) {
        let header = NewBill {
            shop_id: self.shop_id,
            currency_id: self.currency_id,
            payment_method_id: self.payment_method_id,
            user_id: self.user_id,
            created_by: self.created_by,
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
            purchase_date: self.purchase_date,
        };
        (header, self.items)
    }
}

/// Partial update of a bill; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BillItemPatch>>,
}

/// Bill header together with its live items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillWithItems {
    #[serde(flatten)]
    pub bill: Bill,
    pub items: Vec<BillItem>,
}

/// Search criteria for bills; soft-deleted bills never match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillFilter {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub shop_id: Option<i64>,
    #[serde(default)]
    pub currency_id: Option<i64>,
    #[serde(default)]
    pub payment_method_id: Option<i64>,
    /// Inclusive lower bound of the purchase date
    #[serde(default)]
    pub purchased_from: Option<NaiveDate>,
    /// Inclusive upper bound of the purchase date
    #[serde(default)]
    pub purchased_to: Option<NaiveDate>,
}

impl BillFilter {
    /// Restricts the filter to bills owned by `user_id`
    pub fn for_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn matches(&self, bill: &Bill) -> bool {
        !bill.is_deleted()
            && self.user_id.map_or(true, |v| bill.user_id == v)
            && self.shop_id.map_or(true, |v| bill.shop_id == v)
            && self.currency_id.map_or(true, |v| bill.currency_id == v)
            && self.payment_method_id.map_or(true, |v| bill.payment_method_id == v)
            && self.purchased_from.map_or(true, |d| bill.purchase_date >= d)
            && self.purchased_to.map_or(true, |d| bill.purchase_date <= d)
    }
}
