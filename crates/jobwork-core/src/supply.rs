//! Supply: a dispatch of goods to a job worker under a unique invoice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::required, goods::Goods, goods::normalize_name};

/// A persisted supply. `quantity` is the quantity originally dispatched and
/// never changes; what is left to receive is derived in
/// [`Balance`](crate::balance::Balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
  pub supply_id: i64,
  pub date:      NaiveDate,
  pub invoice:   String,
  pub goods:     Goods,
  pub quantity:  i64,
}

/// Input for [`InventoryStore::add_supply`](crate::store::InventoryStore::add_supply).
///
/// If no goods named `goods_name` exists it is created together with the
/// supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupply {
  pub date:       NaiveDate,
  pub invoice:    String,
  pub goods_name: String,
  pub quantity:   i64,
}

impl NewSupply {
  pub fn new(
    date: NaiveDate,
    invoice: impl Into<String>,
    goods_name: impl Into<String>,
    quantity: i64,
  ) -> Self {
    Self {
      date,
      invoice: invoice.into(),
      goods_name: goods_name.into(),
      quantity,
    }
  }

  /// Trim text fields and check every required value is present.
  pub fn validate(self) -> Result<Self> {
    let invoice = required("invoice", &self.invoice)?;
    let goods_name = normalize_name(&self.goods_name)?;
    if self.quantity <= 0 {
      return Err(Error::NonPositiveQuantity(self.quantity));
    }
    Ok(Self { invoice, goods_name, ..self })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() }

  #[test]
  fn validate_trims_fields() {
    let s = NewSupply::new(date(), " INV1 ", " Widget", 5).validate().unwrap();
    assert_eq!(s.invoice, "INV1");
    assert_eq!(s.goods_name, "Widget");
    assert_eq!(s.quantity, 5);
  }

  #[test]
  fn validate_rejects_missing_fields() {
    let err = NewSupply::new(date(), "", "Widget", 5).validate().unwrap_err();
    assert_eq!(err, Error::EmptyField("invoice"));

    let err = NewSupply::new(date(), "INV1", " ", 5).validate().unwrap_err();
    assert_eq!(err, Error::EmptyField("goods name"));
  }

  #[test]
  fn validate_rejects_non_positive_quantity() {
    for qty in [0, -3] {
      let err = NewSupply::new(date(), "INV1", "Widget", qty)
        .validate()
        .unwrap_err();
      assert_eq!(err, Error::NonPositiveQuantity(qty));
    }
  }
}
