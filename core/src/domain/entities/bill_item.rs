//! Bill item entity: one line entry of a bill.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit in which the net price of an item is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetUnit {
    /// Priced per piece; no content value
    Unit,
    Kg,
    G,
    Mg,
    L,
    Ml,
    Cl,
    M,
    Cm,
    Mm,
}

impl NetUnit {
    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NetUnit::Unit => "unit",
            NetUnit::Kg => "kg",
            NetUnit::G => "g",
            NetUnit::Mg => "mg",
            NetUnit::L => "l",
            NetUnit::Ml => "ml",
            NetUnit::Cl => "cl",
            NetUnit::M => "m",
            NetUnit::Cm => "cm",
            NetUnit::Mm => "mm",
        }
    }

    /// Whether items in this unit must carry a content value
    pub fn requires_content_value(&self) -> bool {
        !matches!(self, NetUnit::Unit)
    }
}

impl std::fmt::Display for NetUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NetUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unit" => Ok(NetUnit::Unit),
            "kg" => Ok(NetUnit::Kg),
            "g" => Ok(NetUnit::G),
            "mg" => Ok(NetUnit::Mg),
            "l" => Ok(NetUnit::L),
            "ml" => Ok(NetUnit::Ml),
            "cl" => Ok(NetUnit::Cl),
            "m" => Ok(NetUnit::M),
            "cm" => Ok(NetUnit::Cm),
            "mm" => Ok(NetUnit::Mm),
            other => Err(format!("Invalid net unit: {}", other)),
        }
    }
}

/// Persisted bill item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub net_price: Decimal,
    pub net_unit: NetUnit,
    pub content_value: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BillItem {
    /// Line amount (net price times quantity), `None` when it overflows
    pub fn line_total(&self) -> Option<Decimal> {
        self.net_price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether applying `item` would change any stored value
    pub fn differs_from(&self, item: &NewBillItem) -> bool {
        self.quantity != item.quantity
            || self.net_price != item.net_price
            || self.net_unit != item.net_unit
            || self.content_value != item.content_value
            || self.is_deleted()
    }
}

/// Item row to be inserted or upserted for a known bill
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillItem {
    pub bill_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub net_price: Decimal,
    pub net_unit: NetUnit,
    pub content_value: Option<Decimal>,
}

/// Item specification supplied when creating a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItemInput {
    pub product_id: i64,
    pub quantity: u32,
    pub net_price: Decimal,
    pub net_unit: NetUnit,
    #[serde(default)]
    pub content_value: Option<Decimal>,
}

impl BillItemInput {
    /// Line amount (net price times quantity), `None` when it overflows
    pub fn line_total(&self) -> Option<Decimal> {
        self.net_price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn into_new_item(self, bill_id: i64) -> NewBillItem {
        NewBillItem {
            bill_id,
            product_id: self.product_id,
            quantity: self.quantity,
            net_price: self.net_price,
            net_unit: self.net_unit,
            content_value: self.content_value,
        }
    }
}

/// Item entry of a bill update.
///
/// `id` is set when the entry refers to an item that already exists;
/// `bill_id` is stamped by the update workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItemPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub bill_id: Option<i64>,
    pub product_id: i64,
    pub quantity: u32,
    pub net_price: Decimal,
    pub net_unit: NetUnit,
    #[serde(default)]
    pub content_value: Option<Decimal>,
}

impl BillItemPatch {
    pub fn to_new_item(&self, bill_id: i64) -> NewBillItem {
        NewBillItem {
            bill_id,
            product_id: self.product_id,
            quantity: self.quantity,
            net_price: self.net_price,
            net_unit: self.net_unit,
            content_value: self.content_value,
        }
    }
}
