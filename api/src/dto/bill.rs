use bb_core::domain::entities::{BillFilter, BillItemInput, CreateBillInput};
use bb_shared::Pagination;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/v1/bills`
///
/// Item rules (count, amounts, totals, duplicates) are checked by the bill
/// workflow so that they surface with their own error codes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBillRequest {
    #[validate(range(min = 1))]
    pub shop_id: i64,

    #[validate(range(min = 1))]
    pub currency_id: i64,

    #[validate(range(min = 1))]
    pub payment_method_id: i64,

    /// Owner of the bill; defaults to the caller
    #[serde(default)]
    #[validate(range(min = 1))]
    pub user_id: Option<i64>,

    pub subtotal: Decimal,

    #[serde(default)]
    pub discount: Decimal,

    pub total: Decimal,

    pub purchase_date: NaiveDate,

    #[serde(default)]
    pub items: Vec<BillItemInput>,
}

impl CreateBillRequest {
    pub fn into_input(self, user_id: i64, created_by: i64) -> CreateBillInput {
        CreateBillInput {
            shop_id: self.shop_id,
            currency_id: self.currency_id,
            payment_method_id: self.payment_method_id,
            user_id,
            created_by,
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
            purchase_date: self.purchase_date,
            items: self.items,
        }
    }
}

/// Query string of `GET /api/v1/bills`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub user_id: Option<i64>,
    pub shop_id: Option<i64>,
    pub currency_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub purchased_from: Option<NaiveDate>,
    pub purchased_to: Option<NaiveDate>,
}

impl BillQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }

    pub fn filter(&self) -> BillFilter {
        BillFilter {
            user_id: self.user_id,
            shop_id: self.shop_id,
            currency_id: self.currency_id,
            payment_method_id: self.payment_method_id,
            purchased_from: self.purchased_from,
            purchased_to: self.purchased_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_and_clamping() {
        let query = BillQuery {
            per_page: Some(500),
            ..Default::default()
        };
        let pagination = query.pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, 100);
    }

    #[test]
    fn test_create_request_rejects_zero_ids() {
        let req: CreateBillRequest = serde_json::from_value(serde_json::json!({
            "shop_id": 0,
            "currency_id": 1,
            "payment_method_id": 1,
            "subtotal": "10",
            "total": "10",
            "purchase_date": "2024-03-01",
            "items": []
        }))
        .unwrap();
        assert!(req.validate().is_err());
        assert_eq!(req.discount, Decimal::ZERO);
    }
}
