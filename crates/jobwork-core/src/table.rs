//! Tabular views over the store.
//!
//! A [`Table`] is what the user sees: a title, a header row, and rows of
//! display strings. Filtering and sorting operate on those strings, and the
//! exporters transcribe them verbatim, so on-screen and exported values can
//! never disagree.

use std::cmp::Ordering;

use serde::Serialize;

use crate::{
  Error, Result,
  balance::Balance,
  goods::Goods,
  receipt::Receipt,
  supply::Supply,
};

/// Date format used in every view.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Ascending,
  Descending,
}

impl SortOrder {
  pub fn reversed(self) -> Self {
    match self {
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Ascending,
    }
  }
}

/// A rectangular table of display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
  pub title:   String,
  pub headers: Vec<String>,
  /// Every row has exactly `headers.len()` cells.
  pub rows:    Vec<Vec<String>>,
}

impl Table {
  pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
    Self {
      title:   title.into(),
      headers: headers.iter().map(|h| (*h).to_owned()).collect(),
      rows:    Vec::new(),
    }
  }

  /// Append a row, padding or truncating it to the header width.
  pub fn push_row(&mut self, mut row: Vec<String>) {
    row.resize(self.headers.len(), String::new());
    self.rows.push(row);
  }

  pub fn width(&self) -> usize { self.headers.len() }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Index of the column whose header equals `name`, ignoring case.
  pub fn column_index(&self, name: &str) -> Result<usize> {
    self
      .headers
      .iter()
      .position(|h| h.eq_ignore_ascii_case(name.trim()))
      .ok_or_else(|| Error::UnknownColumn(name.to_owned()))
  }

  /// Indices of the rows where any cell contains `needle`, ignoring case.
  pub fn matching(&self, needle: &str) -> Vec<usize> {
    let needle = needle.to_lowercase();
    self
      .rows
      .iter()
      .enumerate()
      .filter(|(_, row)| {
        needle.is_empty() || row.iter().any(|cell| cell.to_lowercase().contains(&needle))
      })
      .map(|(i, _)| i)
      .collect()
  }

  /// Row indices in stable order of one column. Integer cells come first
  /// in numeric order, then text.
  pub fn order_by(&self, column: usize, order: SortOrder) -> Result<Vec<usize>> {
    if column >= self.width() {
      return Err(Error::UnknownColumn(column.to_string()));
    }
    let mut indices: Vec<usize> = (0..self.len()).collect();
    indices.sort_by(|&a, &b| {
      let ord = compare_cells(&self.rows[a][column], &self.rows[b][column]);
      match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
      }
    });
    Ok(indices)
  }

  /// Filter by `needle`, then sort if asked. Returns indices into `rows`, so
  /// callers holding the records behind the rows can reorder them to match.
  pub fn arrange(&self, needle: &str, sort: Option<(usize, SortOrder)>) -> Result<Vec<usize>> {
    let kept = self.matching(needle);
    let Some((column, order)) = sort else {
      return Ok(kept);
    };
    let subset = self.select(&kept);
    Ok(subset.order_by(column, order)?.into_iter().map(|i| kept[i]).collect())
  }

  /// A copy holding only the rows at `indices`, in that order.
  pub fn select(&self, indices: &[usize]) -> Table {
    Table {
      title:   self.title.clone(),
      headers: self.headers.clone(),
      rows:    indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
    }
  }

  /// Rows where any cell contains `needle`, ignoring case.
  pub fn filtered(&self, needle: &str) -> Table { self.select(&self.matching(needle)) }

  /// Stable sort on one column, ordered as [`Table::order_by`].
  pub fn sorted(&self, column: usize, order: SortOrder) -> Result<Table> {
    Ok(self.select(&self.order_by(column, order)?))
  }

  /// [`Table::sorted`] by header name.
  pub fn sorted_by(&self, column: &str, order: SortOrder) -> Result<Table> {
    self.sorted(self.column_index(column)?, order)
  }

  // ── Views ─────────────────────────────────────────────────────────────

  pub fn goods(goods: &[Goods]) -> Table {
    let mut t = Table::new("Goods", &["Goods Name"]);
    for g in goods {
      t.push_row(vec![g.name.clone()]);
    }
    t
  }

  pub fn supplies(balances: &[Balance]) -> Table {
    let mut t = Table::new(
      "Supply",
      &["Date", "Invoice", "Goods", "Supplied", "Remaining"],
    );
    for b in balances {
      t.push_row(vec![
        b.supply.date.format(DATE_FORMAT).to_string(),
        b.supply.invoice.clone(),
        b.supply.goods.name.clone(),
        b.supply.quantity.to_string(),
        b.remaining().to_string(),
      ]);
    }
    t
  }

  pub fn receipts(receipts: &[Receipt]) -> Table {
    let mut t = Table::new("Receipt", &[
      "Date",
      "Receipt#",
      "Supply#",
      "Goods",
      "Finished",
      "Attribute",
      "Damaged",
    ]);
    for r in receipts {
      t.push_row(vec![
        r.date.format(DATE_FORMAT).to_string(),
        r.receipt_invoice.clone(),
        r.supply_invoice.clone(),
        r.goods.name.clone(),
        r.finished_qty.to_string(),
        r.finished_attr.clone().unwrap_or_default(),
        r.damaged_qty.to_string(),
      ]);
    }
    t
  }

  /// The supply exactly as dispatched.
  pub fn original_bill(supply: &Supply) -> Table {
    let mut t = Table::new(
      format!("Original {}", supply.invoice),
      &["Date", "Invoice", "Goods", "Qty"],
    );
    t.push_row(vec![
      supply.date.format(DATE_FORMAT).to_string(),
      supply.invoice.clone(),
      supply.goods.name.clone(),
      supply.quantity.to_string(),
    ]);
    t
  }

  /// The supply with what has come back and what remains.
  pub fn dynamic_bill(balance: &Balance) -> Table {
    let mut t = Table::new(format!("Dynamic {}", balance.supply.invoice), BALANCE_HEADERS);
    t.push_row(balance_row(balance));
    t
  }

  pub fn open_invoices(balances: &[Balance]) -> Table {
    let mut t = Table::new("Open", BALANCE_HEADERS);
    for b in balances {
      t.push_row(balance_row(b));
    }
    t
  }
}

const BALANCE_HEADERS: &[&str] = &[
  "Date",
  "Invoice",
  "Goods",
  "Supplied",
  "Finished",
  "Damaged",
  "Remaining",
];

fn balance_row(b: &Balance) -> Vec<String> {
  vec![
    b.supply.date.format(DATE_FORMAT).to_string(),
    b.supply.invoice.clone(),
    b.supply.goods.name.clone(),
    b.supply.quantity.to_string(),
    b.finished.to_string(),
    b.damaged.to_string(),
    b.remaining().to_string(),
  ]
}

/// Integers first, in numeric order, then everything else as strings.
fn compare_cells(a: &str, b: &str) -> Ordering {
  match (a.parse::<i64>(), b.parse::<i64>()) {
    (Ok(x), Ok(y)) => x.cmp(&y),
    (Ok(_), Err(_)) => Ordering::Less,
    (Err(_), Ok(_)) => Ordering::Greater,
    (Err(_), Err(_)) => a.cmp(b),
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn sample() -> Table {
    let mut t = Table::new("T", &["Name", "Qty"]);
    t.push_row(vec!["Widget".into(), "9".into()]);
    t.push_row(vec!["bolt".into(), "10".into()]);
    t.push_row(vec!["Nut".into(), "100".into()]);
    t
  }

  fn column(t: &Table, i: usize) -> Vec<&str> {
    t.rows.iter().map(|r| r[i].as_str()).collect()
  }

  #[test]
  fn push_row_pads_to_header_width() {
    let mut t = Table::new("T", &["A", "B", "C"]);
    t.push_row(vec!["x".into()]);
    assert_eq!(t.rows[0], ["x", "", ""]);
  }

  #[test]
  fn filter_matches_any_column_ignoring_case() {
    let t = sample();
    assert_eq!(column(&t.filtered("WID"), 0), ["Widget"]);
    assert_eq!(column(&t.filtered("10"), 0), ["bolt", "Nut"]);
    assert_eq!(t.filtered("").len(), 3);
    assert!(t.filtered("zzz").is_empty());
    assert_eq!(t.filtered("zzz").width(), 2);
  }

  #[test]
  fn sort_is_numeric_for_integer_cells() {
    let t = sample().sorted_by("qty", SortOrder::Ascending).unwrap();
    assert_eq!(column(&t, 1), ["9", "10", "100"]);

    let t = sample().sorted_by("Qty", SortOrder::Descending).unwrap();
    assert_eq!(column(&t, 1), ["100", "10", "9"]);
  }

  #[test]
  fn mixed_columns_put_numbers_before_text() {
    let mut t = Table::new("T", &["Invoice"]);
    for inv in ["1a", "10", "9", "B2", "-3"] {
      t.push_row(vec![inv.into()]);
    }
    let asc = t.sorted(0, SortOrder::Ascending).unwrap();
    assert_eq!(column(&asc, 0), ["-3", "9", "10", "1a", "B2"]);
    let desc = t.sorted(0, SortOrder::Descending).unwrap();
    assert_eq!(column(&desc, 0), ["B2", "1a", "10", "9", "-3"]);
  }

  #[test]
  fn sort_is_lexical_for_text() {
    let t = sample().sorted(0, SortOrder::Ascending).unwrap();
    assert_eq!(column(&t, 0), ["Nut", "Widget", "bolt"]);
  }

  #[test]
  fn unknown_column_is_an_error() {
    assert_eq!(
      sample().sorted_by("Price", SortOrder::Ascending).unwrap_err(),
      Error::UnknownColumn("Price".into())
    );
    assert!(sample().sorted(7, SortOrder::Ascending).is_err());
  }

  #[test]
  fn arrange_filters_before_sorting() {
    let t = sample();
    assert_eq!(t.arrange("", None).unwrap(), [0, 1, 2]);
    assert_eq!(t.arrange("t", Some((1, SortOrder::Descending))).unwrap(), [2, 1, 0]);
    assert_eq!(t.arrange("0", Some((1, SortOrder::Ascending))).unwrap(), [1, 2]);
    assert_eq!(t.select(&[2, 0]).rows[0][0], "Nut");
  }

  #[test]
  fn dynamic_bill_shows_remaining() {
    let supply = Supply {
      supply_id: 1,
      date:      NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
      invoice:   "INV1".into(),
      goods:     Goods { goods_id: 1, name: "Widget".into() },
      quantity:  100,
    };
    let balance = Balance { supply, finished: 60, damaged: 10 };
    let t = Table::dynamic_bill(&balance);
    assert_eq!(t.title, "Dynamic INV1");
    assert_eq!(t.rows, vec![vec![
      "2024-05-06", "INV1", "Widget", "100", "60", "10", "30"
    ]]);
  }

  #[test]
  fn missing_attribute_renders_empty() {
    let r = Receipt {
      receipt_id:      1,
      date:            NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
      receipt_invoice: "R1".into(),
      supply_invoice:  "INV1".into(),
      goods:           Goods { goods_id: 1, name: "Widget".into() },
      finished_qty:    5,
      finished_attr:   None,
      damaged_qty:     0,
    };
    let t = Table::receipts(&[r]);
    assert_eq!(t.rows[0][5], "");
    assert_eq!(t.width(), 7);
  }
}
