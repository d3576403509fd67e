//! Error types for `jobwork-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  // ── Validation: rejected before any write ─────────────────────────────

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("supply quantity must be positive, got {0}")]
  NonPositiveQuantity(i64),

  #[error("{field} must not be negative, got {value}")]
  NegativeQuantity { field: &'static str, value: i64 },

  #[error("a receipt must receive at least one finished or damaged unit")]
  EmptyReceipt,

  #[error("{0} is too large")]
  QuantityOverflow(&'static str),

  // ── Uniqueness ────────────────────────────────────────────────────────

  #[error("goods already exists: {0:?}")]
  DuplicateGoods(String),

  #[error("supply invoice already used: {0:?}")]
  DuplicateSupplyInvoice(String),

  #[error("receipt invoice already used: {0:?}")]
  DuplicateReceiptInvoice(String),

  // ── Reconciliation ────────────────────────────────────────────────────

  #[error("supply invoice not found: {0:?}")]
  SupplyNotFound(String),

  #[error("supply invoice {0:?} is closed; nothing remains to receive")]
  InvoiceClosed(String),

  #[error(
    "receipt of {requested} exceeds the remaining balance of {remaining} on invoice {invoice:?}"
  )]
  OverReceipt {
    invoice:   String,
    requested: i64,
    remaining: i64,
  },

  // ── Views ─────────────────────────────────────────────────────────────

  #[error("unknown column: {0:?}")]
  UnknownColumn(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Trim `raw` and reject it if nothing is left.
pub(crate) fn required(field: &'static str, raw: &str) -> Result<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(Error::EmptyField(field));
  }
  Ok(trimmed.to_owned())
}
