//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings so that text order is date order.
//! Quantities and ids are plain INTEGER columns.

use chrono::NaiveDate;
use jobwork_core::{
  balance::Balance,
  goods::Goods,
  receipt::Receipt,
  supply::Supply,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Select lists ────────────────────────────────────────────────────────────

/// Columns read by [`RawSupply::from_row`]; expects `supplies s` joined with
/// `goods g`.
pub const SUPPLY_COLUMNS: &str =
  "s.supply_id, s.date, s.invoice, g.goods_id, g.name, s.quantity";

/// Columns read by [`RawBalance::from_row`]; expects [`SUPPLY_COLUMNS`]'
/// joins plus `LEFT JOIN receipts r` and a `GROUP BY s.supply_id`.
pub const BALANCE_COLUMNS: &str = "s.supply_id, s.date, s.invoice, g.goods_id, g.name, s.quantity,
   COALESCE(SUM(r.finished_qty), 0),
   COALESCE(SUM(r.damaged_qty), 0)";

/// Columns read by [`RawReceipt::from_row`]; expects `receipts r` joined with
/// `supplies s` and `goods g`.
pub const RECEIPT_COLUMNS: &str = "r.receipt_id, r.date, r.receipt_invoice, s.invoice,
   g.goods_id, g.name, r.finished_qty, r.finished_attr, r.damaged_qty";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `supplies` row joined with `goods`.
pub struct RawSupply {
  pub supply_id:  i64,
  pub date:       String,
  pub invoice:    String,
  pub goods_id:   i64,
  pub goods_name: String,
  pub quantity:   i64,
}

impl RawSupply {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      supply_id:  row.get(0)?,
      date:       row.get(1)?,
      invoice:    row.get(2)?,
      goods_id:   row.get(3)?,
      goods_name: row.get(4)?,
      quantity:   row.get(5)?,
    })
  }

  pub fn into_supply(self) -> Result<Supply> {
    Ok(Supply {
      supply_id: self.supply_id,
      date:      decode_date(&self.date)?,
      invoice:   self.invoice,
      goods:     Goods { goods_id: self.goods_id, name: self.goods_name },
      quantity:  self.quantity,
    })
  }
}

/// A [`RawSupply`] plus the summed receipt quantities.
pub struct RawBalance {
  pub supply:   RawSupply,
  pub finished: i64,
  pub damaged:  i64,
}

impl RawBalance {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      supply:   RawSupply::from_row(row)?,
      finished: row.get(6)?,
      damaged:  row.get(7)?,
    })
  }

  pub fn into_balance(self) -> Result<Balance> {
    Ok(Balance {
      supply:   self.supply.into_supply()?,
      finished: self.finished,
      damaged:  self.damaged,
    })
  }
}

/// Raw values read from a `receipts` row joined with its supply and goods.
pub struct RawReceipt {
  pub receipt_id:      i64,
  pub date:            String,
  pub receipt_invoice: String,
  pub supply_invoice:  String,
  pub goods_id:        i64,
  pub goods_name:      String,
  pub finished_qty:    i64,
  pub finished_attr:   Option<String>,
  pub damaged_qty:     i64,
}

impl RawReceipt {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      receipt_id:      row.get(0)?,
      date:            row.get(1)?,
      receipt_invoice: row.get(2)?,
      supply_invoice:  row.get(3)?,
      goods_id:        row.get(4)?,
      goods_name:      row.get(5)?,
      finished_qty:    row.get(6)?,
      finished_attr:   row.get(7)?,
      damaged_qty:     row.get(8)?,
    })
  }

  pub fn into_receipt(self) -> Result<Receipt> {
    Ok(Receipt {
      receipt_id:      self.receipt_id,
      date:            decode_date(&self.date)?,
      receipt_invoice: self.receipt_invoice,
      supply_invoice:  self.supply_invoice,
      goods:           Goods { goods_id: self.goods_id, name: self.goods_name },
      finished_qty:    self.finished_qty,
      finished_attr:   self.finished_attr,
      damaged_qty:     self.damaged_qty,
    })
  }
}

// ─── Constraint errors ───────────────────────────────────────────────────────

/// Whether `e` is a `UNIQUE` constraint failure.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_roundtrip_keeps_iso_form() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(encode_date(d), "2024-02-29");
    assert_eq!(decode_date("2024-02-29").unwrap(), d);
  }

  #[test]
  fn decode_date_rejects_other_formats() {
    assert!(matches!(decode_date("29/02/2024"), Err(Error::DateParse(_))));
  }
}
