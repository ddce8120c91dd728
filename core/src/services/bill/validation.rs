//! Business-rule validation of a bill and its items.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::domain::entities::{BillItemInput, CreateBillInput, NetUnit};
use crate::errors::{AmountField, BillError};

/// Largest accepted difference between a declared and a computed amount (0.01)
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const AMOUNT_OUT_OF_RANGE: &str = "amount out of range";

/// Validate a bill before anything is written
///
/// Rules are checked in a fixed order and the first violation is returned:
/// items present, subtotal math, total math, discount range, non-negative
/// total, unique products, then each item in input order.
pub fn validate_new_bill(input: &CreateBillInput) -> Result<(), BillError> {
    if input.items.is_empty() {
        return Err(BillError::invalid("bill must contain at least one item"));
    }

    let mut calculated_subtotal = Decimal::ZERO;
    for (position, item) in input.items.iter().enumerate() {
        calculated_subtotal = item
            .line_total()
            .and_then(|line| calculated_subtotal.checked_add(line))
            .ok_or_else(|| BillError::invalid_item(position + 1, AMOUNT_OUT_OF_RANGE))?;
    }
    if !within_tolerance(input.subtotal, calculated_subtotal)? {
        return Err(BillError::total_mismatch(
            AmountField::Subtotal,
            input.subtotal,
            calculated_subtotal,
        ));
    }

    let calculated_total = input
        .subtotal
        .checked_sub(input.discount)
        .ok_or_else(|| BillError::invalid(AMOUNT_OUT_OF_RANGE))?;
    if !within_tolerance(input.total, calculated_total)? {
        return Err(BillError::total_mismatch(
            AmountField::Total,
            input.total,
            calculated_total,
        ));
    }

    if input.discount < Decimal::ZERO || input.discount > input.subtotal {
        return Err(BillError::invalid(
            "discount must be between 0 and the subtotal",
        ));
    }

    if input.total < Decimal::ZERO {
        return Err(BillError::invalid("total must not be negative"));
    }

    let mut products = HashSet::with_capacity(input.items.len());
    for item in &input.items {
        if !products.insert(item.product_id) {
            return Err(BillError::DuplicateProduct {
                product_id: item.product_id,
            });
        }
    }

    for (position, item) in input.items.iter().enumerate() {
        validate_item(position + 1, item)?;
    }

    Ok(())
}

fn within_tolerance(declared: Decimal, calculated: Decimal) -> Result<bool, BillError> {
    declared
        .checked_sub(calculated)
        .map(|diff| diff.abs() <= AMOUNT_TOLERANCE)
        .ok_or_else(|| BillError::invalid(AMOUNT_OUT_OF_RANGE))
}

fn validate_item(index: usize, item: &BillItemInput) -> Result<(), BillError> {
    if item.quantity == 0 {
        return Err(BillError::invalid_item(index, "quantity must be positive"));
    }
    if item.net_price < Decimal::ZERO {
        return Err(BillError::invalid_item(index, "net price must not be negative"));
    }

    match (item.net_unit, item.content_value) {
        (NetUnit::Unit, Some(_)) => Err(BillError::invalid_item(
            index,
            "content value must be empty when net unit is 'unit'",
        )),
        (NetUnit::Unit, None) => Ok(()),
        (_, Some(value)) if value > Decimal::ZERO => Ok(()),
        (unit, _) => Err(BillError::invalid_item(
            index,
            format!("content value must be greater than 0 for net unit '{}'", unit),
        )),
    }
}
