//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use jobwork_core::{
  Error as CoreError,
  receipt::NewReceipt,
  store::InventoryStore,
  supply::NewSupply,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 4, d).unwrap() }

fn supply(invoice: &str, goods: &str, qty: i64) -> NewSupply {
  NewSupply::new(day(1), invoice, goods, qty)
}

fn receipt(receipt_invoice: &str, supply_invoice: &str, finished: i64, damaged: i64) -> NewReceipt {
  NewReceipt::new(day(2), receipt_invoice, supply_invoice, finished, damaged)
}

fn core_err(err: crate::Error) -> CoreError {
  match err {
    crate::Error::Core(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

// ─── Goods ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_goods_sorted_by_name() {
  let s = store().await;
  s.add_goods("Widget".into()).await.unwrap();
  s.add_goods("  Bolt ".into()).await.unwrap();

  let all = s.list_goods().await.unwrap();
  let names: Vec<_> = all.iter().map(|g| g.name.as_str()).collect();
  assert_eq!(names, ["Bolt", "Widget"]);
}

#[tokio::test]
async fn duplicate_goods_is_rejected() {
  let s = store().await;
  s.add_goods("Widget".into()).await.unwrap();

  let err = s.add_goods("Widget".into()).await.unwrap_err();
  assert_eq!(core_err(err), CoreError::DuplicateGoods("Widget".into()));
}

#[tokio::test]
async fn goods_names_are_case_sensitive_in_storage() {
  let s = store().await;
  s.add_goods("Widget".into()).await.unwrap();
  s.add_goods("widget".into()).await.unwrap();
  assert_eq!(s.list_goods().await.unwrap().len(), 2);
}

#[tokio::test]
async fn blank_goods_name_is_rejected() {
  let s = store().await;
  let err = s.add_goods("   ".into()).await.unwrap_err();
  assert_eq!(core_err(err), CoreError::EmptyField("goods name"));
}

#[tokio::test]
async fn suggestions_ignore_case() {
  let s = store().await;
  s.add_goods("Widget".into()).await.unwrap();
  s.add_goods("Gadget".into()).await.unwrap();
  s.add_goods("Blue Widget".into()).await.unwrap();

  let found = s.suggest_goods("wid".into(), 10).await.unwrap();
  let names: Vec<_> = found.iter().map(|g| g.name.as_str()).collect();
  assert_eq!(names, ["Widget", "Blue Widget"]);
}

// ─── Supplies ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_supply_is_retrievable_by_invoice() {
  let s = store().await;
  let added = s.add_supply(supply("INV1", "Widget", 100)).await.unwrap();

  let fetched = s.get_supply("INV1".into()).await.unwrap().unwrap();
  assert_eq!(fetched, added);
  assert_eq!(fetched.quantity, 100);
  assert_eq!(fetched.goods.name, "Widget");
  assert_eq!(s.list_supplies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_supply_creates_goods_once() {
  let s = store().await;
  let a = s.add_supply(supply("INV1", "Widget", 5)).await.unwrap();
  let b = s.add_supply(supply("INV2", "Widget", 7)).await.unwrap();

  assert_eq!(a.goods.goods_id, b.goods.goods_id);
  assert_eq!(s.list_goods().await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_supply_reuses_explicit_goods() {
  let s = store().await;
  let g = s.add_goods("Widget".into()).await.unwrap();
  let sup = s.add_supply(supply("INV1", "Widget", 5)).await.unwrap();
  assert_eq!(sup.goods, g);
}

#[tokio::test]
async fn duplicate_supply_invoice_leaves_no_trace() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 5)).await.unwrap();

  // The new goods name would be created implicitly; the failed insert must
  // roll it back along with the supply.
  let err = s
    .add_supply(supply("INV1", "Gadget", 9))
    .await
    .unwrap_err();
  assert_eq!(core_err(err), CoreError::DuplicateSupplyInvoice("INV1".into()));

  let goods = s.list_goods().await.unwrap();
  assert_eq!(goods.len(), 1);
  assert_eq!(goods[0].name, "Widget");

  let supplies = s.list_supplies().await.unwrap();
  assert_eq!(supplies.len(), 1);
  assert_eq!(supplies[0].quantity, 5);
}

#[tokio::test]
async fn invalid_supply_is_rejected_before_writing() {
  let s = store().await;
  let err = s.add_supply(supply("INV1", "Widget", 0)).await.unwrap_err();
  assert_eq!(core_err(err), CoreError::NonPositiveQuantity(0));
  assert!(s.list_goods().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_supply_missing_returns_none() {
  let s = store().await;
  assert!(s.get_supply("nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn supplies_are_listed_newest_first() {
  let s = store().await;
  s.add_supply(NewSupply::new(day(3), "B", "Widget", 1)).await.unwrap();
  s.add_supply(NewSupply::new(day(9), "C", "Widget", 1)).await.unwrap();
  s.add_supply(NewSupply::new(day(3), "A", "Widget", 1)).await.unwrap();

  let invoices: Vec<_> = s
    .list_supplies()
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.invoice)
    .collect();
  assert_eq!(invoices, ["C", "A", "B"]);
}

// ─── Receipts and reconciliation ─────────────────────────────────────────────

#[tokio::test]
async fn receipts_reduce_remaining_and_close_the_invoice() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 100)).await.unwrap();

  s.add_receipt(receipt("R1", "INV1", 60, 10)).await.unwrap();
  let b = s.balance("INV1".into()).await.unwrap().unwrap();
  assert_eq!((b.finished, b.damaged, b.remaining()), (60, 10, 30));
  assert!(b.is_open());
  assert_eq!(s.open_balances().await.unwrap().len(), 1);

  s.add_receipt(receipt("R2", "INV1", 30, 0)).await.unwrap();
  let b = s.balance("INV1".into()).await.unwrap().unwrap();
  assert_eq!(b.remaining(), 0);
  assert!(!b.is_open());
  assert!(s.open_balances().await.unwrap().is_empty());

  // The dispatched quantity itself never changes.
  let sup = s.get_supply("INV1".into()).await.unwrap().unwrap();
  assert_eq!(sup.quantity, 100);
}

#[tokio::test]
async fn over_receipt_is_rejected_without_writing() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 10)).await.unwrap();
  s.add_receipt(receipt("R1", "INV1", 4, 1)).await.unwrap();

  let err = s
    .add_receipt(receipt("R2", "INV1", 5, 1))
    .await
    .unwrap_err();
  assert_eq!(core_err(err), CoreError::OverReceipt {
    invoice:   "INV1".into(),
    requested: 6,
    remaining: 5,
  });
  assert_eq!(s.list_receipts().await.unwrap().len(), 1);

  // Exactly the remainder is fine.
  s.add_receipt(receipt("R2", "INV1", 5, 0)).await.unwrap();
  let b = s.balance("INV1".into()).await.unwrap().unwrap();
  assert_eq!(b.remaining(), 0);
}

#[tokio::test]
async fn receipt_quantities_summing_past_i64_are_rejected() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 10)).await.unwrap();

  let err = s
    .add_receipt(receipt("R1", "INV1", i64::MAX, 1))
    .await
    .unwrap_err();
  assert_eq!(core_err(err), CoreError::QuantityOverflow("received quantity"));

  // A single huge quantity passes validation but not the balance check.
  let err = s
    .add_receipt(receipt("R1", "INV1", i64::MAX, 0))
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::OverReceipt { remaining: 10, .. }));

  assert!(s.list_receipts().await.unwrap().is_empty());
  let b = s.balance("INV1".into()).await.unwrap().unwrap();
  assert_eq!((b.finished, b.damaged, b.remaining()), (0, 0, 10));
}

#[tokio::test]
async fn closed_invoice_rejects_receipts() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 3)).await.unwrap();
  s.add_receipt(receipt("R1", "INV1", 3, 0)).await.unwrap();

  let err = s
    .add_receipt(receipt("R2", "INV1", 0, 1))
    .await
    .unwrap_err();
  assert_eq!(core_err(err), CoreError::InvoiceClosed("INV1".into()));
}

#[tokio::test]
async fn receipt_against_unknown_supply_is_rejected() {
  let s = store().await;
  let err = s
    .add_receipt(receipt("R1", "missing", 1, 0))
    .await
    .unwrap_err();
  assert_eq!(core_err(err), CoreError::SupplyNotFound("missing".into()));
}

#[tokio::test]
async fn duplicate_receipt_invoice_is_rejected() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 10)).await.unwrap();
  s.add_supply(supply("INV2", "Widget", 10)).await.unwrap();
  s.add_receipt(receipt("R1", "INV1", 2, 0)).await.unwrap();

  let err = s
    .add_receipt(receipt("R1", "INV2", 2, 0))
    .await
    .unwrap_err();
  assert_eq!(core_err(err), CoreError::DuplicateReceiptInvoice("R1".into()));

  let b = s.balance("INV2".into()).await.unwrap().unwrap();
  assert_eq!(b.remaining(), 10);
}

#[tokio::test]
async fn receipt_takes_goods_from_supply() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 10)).await.unwrap();
  let r = s
    .add_receipt(receipt("R1", "INV1", 2, 1).with_attr("red"))
    .await
    .unwrap();

  assert_eq!(r.goods.name, "Widget");
  assert_eq!(r.supply_invoice, "INV1");

  let listed = s.list_receipts().await.unwrap();
  assert_eq!(listed, vec![r]);
  assert_eq!(listed[0].finished_attr.as_deref(), Some("red"));
}

#[tokio::test]
async fn receipts_for_filters_by_supply() {
  let s = store().await;
  s.add_supply(supply("INV1", "Widget", 10)).await.unwrap();
  s.add_supply(supply("INV2", "Gadget", 10)).await.unwrap();
  s.add_receipt(receipt("R1", "INV1", 1, 0)).await.unwrap();
  s.add_receipt(receipt("R2", "INV2", 1, 0)).await.unwrap();
  s.add_receipt(receipt("R3", "INV1", 0, 2)).await.unwrap();

  let for_inv1: Vec<_> = s
    .receipts_for("INV1".into())
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.receipt_invoice)
    .collect();
  assert_eq!(for_inv1, ["R1", "R3"]);
  assert!(s.receipts_for("nope".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn open_balances_are_ordered_by_invoice() {
  let s = store().await;
  s.add_supply(supply("INV3", "Widget", 5)).await.unwrap();
  s.add_supply(supply("INV1", "Widget", 5)).await.unwrap();
  s.add_supply(supply("INV2", "Widget", 5)).await.unwrap();
  s.add_receipt(receipt("R1", "INV2", 5, 0)).await.unwrap();

  let open: Vec<_> = s
    .open_balances()
    .await
    .unwrap()
    .into_iter()
    .map(|b| b.supply.invoice)
    .collect();
  assert_eq!(open, ["INV1", "INV3"]);

  let all = s.supply_balances().await.unwrap();
  assert_eq!(all.len(), 3);
  let closed = all.iter().find(|b| b.supply.invoice == "INV2").unwrap();
  assert_eq!(closed.remaining(), 0);
}

#[tokio::test]
async fn balance_of_unknown_invoice_is_none() {
  let s = store().await;
  assert!(s.balance("nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn store_reopens_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("inventory.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_supply(supply("INV1", "Widget", 8)).await.unwrap();
    s.add_receipt(receipt("R1", "INV1", 3, 0)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let b = s.balance("INV1".into()).await.unwrap().unwrap();
  assert_eq!(b.remaining(), 5);
}
