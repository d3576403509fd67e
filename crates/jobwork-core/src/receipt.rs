//! Receipt: finished and damaged goods returned against a supply.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::required, goods::Goods};

/// A persisted receipt. Receipts are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
  pub receipt_id:      i64,
  pub date:            NaiveDate,
  pub receipt_invoice: String,
  pub supply_invoice:  String,
  /// Always the goods of the referenced supply.
  pub goods:           Goods,
  pub finished_qty:    i64,
  /// Free-text attribute of the finished goods (colour, lot, etc.).
  pub finished_attr:   Option<String>,
  pub damaged_qty:     i64,
}

impl Receipt {
  /// Units this receipt consumes from its supply.
  pub fn received(&self) -> i64 { self.finished_qty.saturating_add(self.damaged_qty) }
}

/// Input for [`InventoryStore::add_receipt`](crate::store::InventoryStore::add_receipt).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReceipt {
  pub date:            NaiveDate,
  pub receipt_invoice: String,
  pub supply_invoice:  String,
  pub finished_qty:    i64,
  pub finished_attr:   Option<String>,
  pub damaged_qty:     i64,
}

impl NewReceipt {
  pub fn new(
    date: NaiveDate,
    receipt_invoice: impl Into<String>,
    supply_invoice: impl Into<String>,
    finished_qty: i64,
    damaged_qty: i64,
  ) -> Self {
    Self {
      date,
      receipt_invoice: receipt_invoice.into(),
      supply_invoice: supply_invoice.into(),
      finished_qty,
      finished_attr: None,
      damaged_qty,
    }
  }

  pub fn with_attr(mut self, attr: impl Into<String>) -> Self {
    self.finished_attr = Some(attr.into());
    self
  }

  /// Units this receipt would consume from its supply.
  pub fn received(&self) -> i64 { self.finished_qty.saturating_add(self.damaged_qty) }

  /// Trim text fields, drop a blank attribute, and check quantities.
  pub fn validate(self) -> Result<Self> {
    let receipt_invoice = required("receipt invoice", &self.receipt_invoice)?;
    let supply_invoice = required("supply invoice", &self.supply_invoice)?;

    if self.finished_qty < 0 {
      return Err(Error::NegativeQuantity {
        field: "finished quantity",
        value: self.finished_qty,
      });
    }
    if self.damaged_qty < 0 {
      return Err(Error::NegativeQuantity {
        field: "damaged quantity",
        value: self.damaged_qty,
      });
    }
    match self.finished_qty.checked_add(self.damaged_qty) {
      None => return Err(Error::QuantityOverflow("received quantity")),
      Some(0) => return Err(Error::EmptyReceipt),
      Some(_) => {}
    }

    let finished_attr = self
      .finished_attr
      .as_deref()
      .map(str::trim)
      .filter(|a| !a.is_empty())
      .map(str::to_owned);

    Ok(Self {
      receipt_invoice,
      supply_invoice,
      finished_attr,
      ..self
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, 2).unwrap() }

  #[test]
  fn validate_normalises_attribute() {
    let r = NewReceipt::new(date(), "R1", "INV1", 3, 0)
      .with_attr("   ")
      .validate()
      .unwrap();
    assert_eq!(r.finished_attr, None);

    let r = NewReceipt::new(date(), " R1 ", "INV1", 3, 0)
      .with_attr(" blue ")
      .validate()
      .unwrap();
    assert_eq!(r.receipt_invoice, "R1");
    assert_eq!(r.finished_attr.as_deref(), Some("blue"));
  }

  #[test]
  fn validate_requires_something_received() {
    let err = NewReceipt::new(date(), "R1", "INV1", 0, 0)
      .validate()
      .unwrap_err();
    assert_eq!(err, Error::EmptyReceipt);
  }

  #[test]
  fn validate_allows_damaged_only() {
    let r = NewReceipt::new(date(), "R1", "INV1", 0, 4).validate().unwrap();
    assert_eq!(r.received(), 4);
  }

  #[test]
  fn validate_rejects_negative_quantities() {
    let err = NewReceipt::new(date(), "R1", "INV1", -1, 5)
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::NegativeQuantity { field: "finished quantity", .. }));

    let err = NewReceipt::new(date(), "R1", "INV1", 5, -1)
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::NegativeQuantity { field: "damaged quantity", .. }));
  }

  #[test]
  fn validate_rejects_a_sum_past_i64() {
    let err = NewReceipt::new(date(), "R1", "INV1", i64::MAX, 1)
      .validate()
      .unwrap_err();
    assert_eq!(err, Error::QuantityOverflow("received quantity"));
    assert!(NewReceipt::new(date(), "R1", "INV1", i64::MAX, 0).validate().is_ok());
  }

  #[test]
  fn validate_requires_both_invoices() {
    let err = NewReceipt::new(date(), "", "INV1", 1, 0).validate().unwrap_err();
    assert_eq!(err, Error::EmptyField("receipt invoice"));
    let err = NewReceipt::new(date(), "R1", " ", 1, 0).validate().unwrap_err();
    assert_eq!(err, Error::EmptyField("supply invoice"));
  }
}
