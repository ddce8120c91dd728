//! Unit tests for bill validation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::entities::{BillItemInput, CreateBillInput, NetUnit};
use crate::errors::{AmountField, BillError};
use crate::services::bill::validate_new_bill;

fn unit_item(product_id: i64, quantity: u32, net_price: Decimal) -> BillItemInput {
    BillItemInput {
        product_id,
        quantity,
        net_price,
        net_unit: NetUnit::Unit,
        content_value: None,
    }
}

fn bill(subtotal: Decimal, discount: Decimal, total: Decimal, items: Vec<BillItemInput>) -> CreateBillInput {
    CreateBillInput {
        shop_id: 1,
        currency_id: 1,
        payment_method_id: 1,
        user_id: 1,
        created_by: 1,
        subtotal,
        discount,
        total,
        purchase_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        items,
    }
}

#[test]
fn test_valid_bill() {
    let input = bill(
        dec!(150.5),
        dec!(0),
        dec!(150.5),
        vec![unit_item(1, 2, dec!(75.25))],
    );
    assert!(validate_new_bill(&input).is_ok());
}

#[test]
fn test_empty_items() {
    let input = bill(dec!(0), dec!(0), dec!(0), vec![]);
    assert!(matches!(
        validate_new_bill(&input),
        Err(BillError::InvalidAggregate { .. })
    ));
}

#[test]
fn test_subtotal_mismatch_reports_figures() {
    let input = bill(dec!(100), dec!(0), dec!(100), vec![unit_item(1, 2, dec!(75.25))]);
    let err = validate_new_bill(&input).unwrap_err();

    assert_eq!(
        err,
        BillError::TotalMismatch {
            field: AmountField::Subtotal,
            expected: dec!(100),
            calculated: dec!(150.5),
        }
    );
    let message = err.to_string();
    assert!(message.contains("expected 100"));
    assert!(message.contains("calculated 150.5"));
}

#[test]
fn test_tolerance_boundary() {
    let within = bill(dec!(10.01), dec!(0), dec!(10.01), vec![unit_item(1, 1, dec!(10))]);
    assert!(validate_new_bill(&within).is_ok());

    let beyond = bill(dec!(10.02), dec!(0), dec!(10.02), vec![unit_item(1, 1, dec!(10))]);
    assert!(matches!(
        validate_new_bill(&beyond),
        Err(BillError::TotalMismatch { field: AmountField::Subtotal, .. })
    ));
}

#[test]
fn test_total_mismatch() {
    let input = bill(dec!(20), dec!(5), dec!(20), vec![unit_item(1, 2, dec!(10))]);
    assert!(matches!(
        validate_new_bill(&input),
        Err(BillError::TotalMismatch { field: AmountField::Total, .. })
    ));
}

#[test]
fn test_discount_out_of_range() {
    let negative = bill(dec!(20), dec!(-5), dec!(25), vec![unit_item(1, 2, dec!(10))]);
    assert!(matches!(
        validate_new_bill(&negative),
        Err(BillError::InvalidAggregate { .. })
    ));

    let too_large = bill(dec!(20), dec!(30), dec!(-10), vec![unit_item(1, 2, dec!(10))]);
    assert!(matches!(
        validate_new_bill(&too_large),
        Err(BillError::InvalidAggregate { .. })
    ));
}

#[test]
fn test_duplicate_product() {
    let input = bill(
        dec!(30),
        dec!(0),
        dec!(30),
        vec![unit_item(7, 1, dec!(10)), unit_item(7, 2, dec!(10))],
    );
    assert_eq!(
        validate_new_bill(&input).unwrap_err(),
        BillError::DuplicateProduct { product_id: 7 }
    );
}

#[test]
fn test_unit_item_with_content_value() {
    let mut second = unit_item(2, 1, dec!(5));
    second.content_value = Some(dec!(1));
    let input = bill(dec!(15), dec!(0), dec!(15), vec![unit_item(1, 1, dec!(10)), second]);

    match validate_new_bill(&input).unwrap_err() {
        BillError::InvalidItem { index, .. } => assert_eq!(index, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_measured_item_requires_positive_content_value() {
    for content_value in [None, Some(dec!(0)), Some(dec!(-1))] {
        let item = BillItemInput {
            product_id: 1,
            quantity: 1,
            net_price: dec!(3),
            net_unit: NetUnit::Kg,
            content_value,
        };
        let input = bill(dec!(3), dec!(0), dec!(3), vec![item]);
        assert!(matches!(
            validate_new_bill(&input),
            Err(BillError::InvalidItem { index: 1, .. })
        ));
    }

    let ok = BillItemInput {
        product_id: 1,
        quantity: 1,
        net_price: dec!(3),
        net_unit: NetUnit::Ml,
        content_value: Some(dec!(500)),
    };
    assert!(validate_new_bill(&bill(dec!(3), dec!(0), dec!(3), vec![ok])).is_ok());
}

#[test]
fn test_zero_quantity() {
    let input = bill(dec!(0), dec!(0), dec!(0), vec![unit_item(1, 0, dec!(10))]);
    assert!(matches!(
        validate_new_bill(&input),
        Err(BillError::InvalidItem { index: 1, .. })
    ));
}

#[test]
fn test_line_total_overflow_is_rejected() {
    let input = bill(Decimal::MAX, dec!(0), Decimal::MAX, vec![unit_item(1, 2, Decimal::MAX)]);
    assert_eq!(
        validate_new_bill(&input),
        Err(BillError::invalid_item(1, "amount out of range"))
    );
}

#[test]
fn test_subtotal_sum_overflow_points_at_item() {
    let input = bill(
        Decimal::MAX,
        dec!(0),
        Decimal::MAX,
        vec![unit_item(1, 1, Decimal::MAX), unit_item(2, 1, Decimal::MAX)],
    );
    assert!(matches!(
        validate_new_bill(&input),
        Err(BillError::InvalidItem { index: 2, .. })
    ));
}

#[test]
fn test_amount_differences_out_of_range() {
    let discount_overflow = bill(
        Decimal::MAX,
        -Decimal::MAX,
        Decimal::MAX,
        vec![unit_item(1, 1, Decimal::MAX)],
    );
    assert!(matches!(
        validate_new_bill(&discount_overflow),
        Err(BillError::InvalidAggregate { .. })
    ));

    let declared_overflow = bill(-Decimal::MAX, dec!(0), dec!(0), vec![unit_item(1, 1, Decimal::MAX)]);
    assert!(matches!(
        validate_new_bill(&declared_overflow),
        Err(BillError::InvalidAggregate { .. })
    ));
}
