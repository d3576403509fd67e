//! Reconciliation of supplies against receipts.
//!
//! A supply's `quantity` is the immutable dispatched amount. Everything that
//! has come back is summed from its receipts, and the remaining balance is
//! always `quantity - (finished + damaged)`. Nothing here is stored; a
//! [`Balance`] is computed on every read.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, receipt::NewReceipt, supply::Supply};

/// A supply together with the totals received against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
  pub supply:   Supply,
  /// Sum of `finished_qty` over all receipts for the supply.
  pub finished: i64,
  /// Sum of `damaged_qty` over all receipts for the supply.
  pub damaged:  i64,
}

impl Balance {
  /// A balance with nothing received yet.
  pub fn untouched(supply: Supply) -> Self {
    Self { supply, finished: 0, damaged: 0 }
  }

  pub fn received(&self) -> i64 { self.finished.saturating_add(self.damaged) }

  /// Originally supplied quantity minus everything received.
  pub fn remaining(&self) -> i64 { self.supply.quantity.saturating_sub(self.received()) }

  /// An invoice stays open while anything remains to be received.
  pub fn is_open(&self) -> bool { self.remaining() > 0 }

  /// Check that `receipt` may be posted against this balance.
  ///
  /// Over-receipt is rejected rather than clamped: a receipt of exactly the
  /// remaining balance is accepted and closes the invoice.
  pub fn admit(&self, receipt: &NewReceipt) -> Result<()> {
    if !self.is_open() {
      return Err(Error::InvoiceClosed(self.supply.invoice.clone()));
    }
    let requested = receipt.received();
    let remaining = self.remaining();
    if requested > remaining {
      return Err(Error::OverReceipt {
        invoice: self.supply.invoice.clone(),
        requested,
        remaining,
      });
    }
    Ok(())
  }

  /// The balance after `receipt` is posted.
  pub fn apply(&self, receipt: &NewReceipt) -> Result<Self> {
    self.admit(receipt)?;
    let overflow = || Error::QuantityOverflow("received quantity");
    Ok(Self {
      supply:   self.supply.clone(),
      finished: self.finished.checked_add(receipt.finished_qty).ok_or_else(overflow)?,
      damaged:  self.damaged.checked_add(receipt.damaged_qty).ok_or_else(overflow)?,
    })
  }
}
