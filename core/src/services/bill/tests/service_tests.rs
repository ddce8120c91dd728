//! Unit tests for the bill service over the in-memory store

use std::sync::Arc;

use bb_shared::Pagination;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::entities::{
    BillFilter, BillItemInput, BillItemPatch, BillPatch, CreateBillInput, NetUnit,
};
use crate::errors::{BillError, DomainError};
use crate::repositories::InMemoryBillStore;
use crate::services::bill::BillService;

fn item(product_id: i64, quantity: u32, net_price: Decimal) -> BillItemInput {
    BillItemInput {
        product_id,
        quantity,
        net_price,
        net_unit: NetUnit::Unit,
        content_value: None,
    }
}

fn input(items: Vec<BillItemInput>) -> CreateBillInput {
    let subtotal: Decimal = items.iter().filter_map(BillItemInput::line_total).sum();
    CreateBillInput {
        shop_id: 1,
        currency_id: 1,
        payment_method_id: 1,
        user_id: 1,
        created_by: 1,
        subtotal,
        discount: dec!(0),
        total: subtotal,
        purchase_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        items,
    }
}

fn patch_item(id: Option<i64>, product_id: i64, quantity: u32) -> BillItemPatch {
    BillItemPatch {
        id,
        bill_id: None,
        product_id,
        quantity,
        net_price: dec!(10),
        net_unit: NetUnit::Unit,
        content_value: None,
    }
}

fn service() -> (InMemoryBillStore, BillService<InMemoryBillStore>) {
    let store = InMemoryBillStore::new();
    let service = BillService::new(Arc::new(store.clone()));
    (store, service)
}

#[tokio::test]
async fn test_create_commits_and_releases() {
    let (store, service) = service();

    let bill = service
        .create_bill(input(vec![item(1, 2, dec!(10)), item(2, 1, dec!(5))]))
        .await
        .unwrap();

    assert_eq!(bill.total, dec!(25));
    assert_eq!(store.items().await.len(), 2);
    assert_eq!(store.commit_count(), 1);
    assert_eq!(store.rollback_count(), 0);
    assert_eq!(store.release_count(), 1);
}

#[tokio::test]
async fn test_validation_failure_writes_nothing() {
    let (store, service) = service();
    let mut bad = input(vec![item(1, 2, dec!(10))]);
    bad.subtotal = dec!(5);

    let err = service.create_bill(bad).await.unwrap_err();

    assert!(matches!(err, DomainError::Bill(BillError::TotalMismatch { .. })));
    assert!(store.bills().await.is_empty());
    assert_eq!(store.rollback_count(), 1);
    assert_eq!(store.release_count(), 1);
}

#[tokio::test]
async fn test_item_failure_rolls_back_header() {
    let (store, service) = service();
    store.fail_item_write_at(3);

    let err = service
        .create_bill(input(vec![
            item(1, 1, dec!(1)),
            item(2, 1, dec!(1)),
            item(3, 1, dec!(1)),
        ]))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Internal { ref message } if message.contains("simulated")));
    assert!(store.bills().await.is_empty());
    assert!(store.items().await.is_empty());
    assert_eq!(store.commit_count(), 0);
    assert_eq!(store.release_count(), 1);
}

#[tokio::test]
async fn test_update_missing_bill() {
    let (store, service) = service();

    let err = service.update_bill(42, BillPatch::default()).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
    assert_eq!(store.rollback_count(), 1);
    assert_eq!(store.release_count(), 1);
}

#[tokio::test]
async fn test_update_header_only_keeps_items() {
    let (store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10))]))
        .await
        .unwrap();

    let patch = BillPatch {
        shop_id: Some(9),
        ..Default::default()
    };
    let applied = service.update_bill(bill.id, patch.clone()).await.unwrap();
    assert_eq!(applied, patch);

    let stored = service.get_bill(bill.id).await.unwrap();
    assert_eq!(stored.bill.shop_id, 9);
    assert_eq!(stored.items.len(), 1);
    assert_eq!(store.commit_count(), 2);
}

#[tokio::test]
async fn test_update_with_named_items_prunes_the_rest() {
    let (_store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10)), item(2, 1, dec!(10))]))
        .await
        .unwrap();
    let items = service.get_bill(bill.id).await.unwrap().items;
    let first = items.iter().find(|i| i.product_id == 1).unwrap();

    let patch = BillPatch {
        items: Some(vec![patch_item(Some(first.id), 1, 3), patch_item(None, 5, 1)]),
        ..Default::default()
    };
    let applied = service.update_bill(bill.id, patch).await.unwrap();
    assert!(applied
        .items
        .unwrap()
        .iter()
        .all(|i| i.bill_id == Some(bill.id)));

    let live = service.get_bill(bill.id).await.unwrap().items;
    let mut products: Vec<i64> = live.iter().map(|i| i.product_id).collect();
    products.sort();
    assert_eq!(products, vec![1, 5]);
    assert_eq!(live.iter().find(|i| i.product_id == 1).unwrap().quantity, 3);
}

#[tokio::test]
async fn test_update_with_only_new_items_does_not_prune() {
    let (_store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10)), item(2, 1, dec!(10))]))
        .await
        .unwrap();

    let patch = BillPatch {
        items: Some(vec![patch_item(None, 3, 1)]),
        ..Default::default()
    };
    service.update_bill(bill.id, patch).await.unwrap();

    assert_eq!(service.get_bill(bill.id).await.unwrap().items.len(), 3);
}

#[tokio::test]
async fn test_update_naming_unknown_item_does_not_prune() {
    let (_store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10)), item(2, 1, dec!(10))]))
        .await
        .unwrap();

    let patch = BillPatch {
        items: Some(vec![patch_item(Some(9999), 3, 1)]),
        ..Default::default()
    };
    service.update_bill(bill.id, patch).await.unwrap();

    let items = service.get_bill(bill.id).await.unwrap().items;
    assert_eq!(items.len(), 3);
    assert!(items.iter().any(|i| i.product_id == 3));
}

#[tokio::test]
async fn test_update_with_empty_item_list_touches_no_items() {
    let (_store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10))]))
        .await
        .unwrap();

    let patch = BillPatch {
        items: Some(vec![]),
        ..Default::default()
    };
    service.update_bill(bill.id, patch).await.unwrap();

    assert_eq!(service.get_bill(bill.id).await.unwrap().items.len(), 1);
}

#[tokio::test]
async fn test_failed_upsert_rolls_back_header_change() {
    let (store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10))]))
        .await
        .unwrap();
    store.fail_item_write_at(1);

    let patch = BillPatch {
        shop_id: Some(77),
        items: Some(vec![patch_item(None, 2, 1)]),
        ..Default::default()
    };
    assert!(service.update_bill(bill.id, patch).await.is_err());

    store.clear_failures();
    let stored = service.get_bill(bill.id).await.unwrap();
    assert_eq!(stored.bill.shop_id, 1);
    assert_eq!(stored.items.len(), 1);
}

#[tokio::test]
async fn test_delete_cascades_and_hides_bill() {
    let (store, service) = service();
    let bill = service
        .create_bill(input(vec![item(1, 1, dec!(10)), item(2, 1, dec!(10))]))
        .await
        .unwrap();

    service.delete_bill(bill.id).await.unwrap();

    assert!(matches!(
        service.get_bill(bill.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(store.items().await.iter().all(|i| i.deleted_at.is_some()));
    assert!(matches!(
        service.delete_bill(bill.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_search_and_list() {
    let (store, service) = service();
    for user_id in [1, 1, 2] {
        let mut bill = input(vec![item(1, 1, dec!(10))]);
        bill.user_id = user_id;
        service.create_bill(bill).await.unwrap();
    }

    let page = service
        .search_bills(BillFilter::default().for_user(1), Pagination::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.data.iter().all(|b| b.user_id == 1));

    let all = service.list_bills(Pagination::new(1, 2)).await.unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.data.len(), 2);
    assert!(all.has_next);

    // reads never commit
    assert_eq!(store.commit_count(), 3);
}
