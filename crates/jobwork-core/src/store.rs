//! The `InventoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `jobwork-store-sqlite`).
//! Higher layers (`jobwork-cli`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  balance::Balance,
  goods::Goods,
  receipt::{NewReceipt, Receipt},
  supply::{NewSupply, Supply},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a jobwork inventory backend.
///
/// Goods, supplies and receipts are append-only. The remaining balance of a
/// supply is never stored; backends compute it from the original quantity and
/// the receipts posted against it.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait InventoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Goods ─────────────────────────────────────────────────────────────

  /// Create a goods record. Fails if the exact name already exists.
  fn add_goods(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Goods, Self::Error>> + Send + '_;

  /// All goods, ordered by name.
  fn list_goods(&self) -> impl Future<Output = Result<Vec<Goods>, Self::Error>> + Send + '_;

  /// Case-insensitive autocomplete over goods names; see
  /// [`goods::suggest`](crate::goods::suggest) for the ranking.
  fn suggest_goods(
    &self,
    typed: String,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Goods>, Self::Error>> + Send + '_;

  // ── Supplies ──────────────────────────────────────────────────────────

  /// Record a supply, creating its goods if the name is new.
  ///
  /// The goods insert and the supply insert succeed or fail together. A
  /// duplicate invoice leaves no trace.
  fn add_supply(
    &self,
    input: NewSupply,
  ) -> impl Future<Output = Result<Supply, Self::Error>> + Send + '_;

  /// Retrieve a supply by invoice. Returns `None` if not found.
  fn get_supply(
    &self,
    invoice: String,
  ) -> impl Future<Output = Result<Option<Supply>, Self::Error>> + Send + '_;

  /// All supplies, newest first.
  fn list_supplies(&self)
  -> impl Future<Output = Result<Vec<Supply>, Self::Error>> + Send + '_;

  // ── Receipts ──────────────────────────────────────────────────────────

  /// Record a receipt against an open supply invoice.
  ///
  /// Returns an error if the supply is unknown or closed, or if the receipt
  /// would take more than the remaining balance.
  fn add_receipt(
    &self,
    input: NewReceipt,
  ) -> impl Future<Output = Result<Receipt, Self::Error>> + Send + '_;

  /// All receipts, newest first.
  fn list_receipts(&self)
  -> impl Future<Output = Result<Vec<Receipt>, Self::Error>> + Send + '_;

  /// Receipts posted against one supply invoice, oldest first.
  fn receipts_for(
    &self,
    supply_invoice: String,
  ) -> impl Future<Output = Result<Vec<Receipt>, Self::Error>> + Send + '_;

  // ── Balances ──────────────────────────────────────────────────────────

  /// The balance of one supply invoice. Returns `None` if not found.
  fn balance(
    &self,
    invoice: String,
  ) -> impl Future<Output = Result<Option<Balance>, Self::Error>> + Send + '_;

  /// Balances of every supply, newest first.
  fn supply_balances(&self)
  -> impl Future<Output = Result<Vec<Balance>, Self::Error>> + Send + '_;

  /// Balances of open invoices only, ordered by invoice.
  fn open_balances(&self)
  -> impl Future<Output = Result<Vec<Balance>, Self::Error>> + Send + '_;
}
