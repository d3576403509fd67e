//! [`SqliteStore`], the SQLite implementation of [`InventoryStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, params};

use jobwork_core::{
  Error as CoreError,
  balance::Balance,
  goods::{self, Goods, normalize_name},
  receipt::{NewReceipt, Receipt},
  store::InventoryStore,
  supply::{NewSupply, Supply},
};

use crate::{
  Result,
  encode::{
    BALANCE_COLUMNS, RECEIPT_COLUMNS, RawBalance, RawReceipt, RawSupply, SUPPLY_COLUMNS,
    encode_date, is_unique_violation,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A jobwork inventory store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every
/// request runs in order on the one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened inventory store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for SqliteStore {
  type Error = crate::Error;

  // ── Goods ─────────────────────────────────────────────────────────────────

  async fn add_goods(&self, name: String) -> Result<Goods> {
    let name = normalize_name(&name)?;
    let goods = self
      .conn
      .call(move |conn| Ok(insert_goods(conn, name)))
      .await??;
    tracing::debug!(goods_id = goods.goods_id, name = %goods.name, "added goods");
    Ok(goods)
  }

  async fn list_goods(&self) -> Result<Vec<Goods>> {
    let goods = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT goods_id, name FROM goods ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Goods {
              goods_id: row.get(0)?,
              name:     row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(goods)
  }

  async fn suggest_goods(&self, typed: String, limit: usize) -> Result<Vec<Goods>> {
    let all = self.list_goods().await?;
    Ok(goods::suggest(&all, &typed, limit).into_iter().cloned().collect())
  }

  // ── Supplies ──────────────────────────────────────────────────────────────

  async fn add_supply(&self, input: NewSupply) -> Result<Supply> {
    let input = input.validate()?;
    let supply = self
      .conn
      .call(move |conn| Ok(insert_supply(conn, input)))
      .await??;
    tracing::debug!(
      supply_id = supply.supply_id,
      invoice = %supply.invoice,
      goods = %supply.goods.name,
      quantity = supply.quantity,
      "added supply"
    );
    Ok(supply)
  }

  async fn get_supply(&self, invoice: String) -> Result<Option<Supply>> {
    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {SUPPLY_COLUMNS}
           FROM supplies s JOIN goods g ON g.goods_id = s.goods_id
           WHERE s.invoice = ?1"
        );
        Ok(
          conn
            .query_row(&sql, params![invoice], RawSupply::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSupply::into_supply).transpose()
  }

  async fn list_supplies(&self) -> Result<Vec<Supply>> {
    let raws = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {SUPPLY_COLUMNS}
           FROM supplies s JOIN goods g ON g.goods_id = s.goods_id
           ORDER BY s.date DESC, s.invoice"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawSupply::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawSupply::into_supply).collect()
  }

  // ── Receipts ──────────────────────────────────────────────────────────────

  async fn add_receipt(&self, input: NewReceipt) -> Result<Receipt> {
    let input = input.validate()?;
    let receipt = self
      .conn
      .call(move |conn| Ok(insert_receipt(conn, input)))
      .await??;
    tracing::debug!(
      receipt_id = receipt.receipt_id,
      receipt_invoice = %receipt.receipt_invoice,
      supply_invoice = %receipt.supply_invoice,
      received = receipt.received(),
      "added receipt"
    );
    Ok(receipt)
  }

  async fn list_receipts(&self) -> Result<Vec<Receipt>> {
    self
      .select_receipts(None, "ORDER BY r.date DESC, r.receipt_invoice")
      .await
  }

  async fn receipts_for(&self, supply_invoice: String) -> Result<Vec<Receipt>> {
    self
      .select_receipts(Some(supply_invoice), "ORDER BY r.date, r.receipt_id")
      .await
  }

  // ── Balances ──────────────────────────────────────────────────────────────

  async fn balance(&self, invoice: String) -> Result<Option<Balance>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_balance(conn, &invoice)?))
      .await?;
    raw.map(RawBalance::into_balance).transpose()
  }

  async fn supply_balances(&self) -> Result<Vec<Balance>> {
    self
      .select_balances("ORDER BY s.date DESC, s.invoice")
      .await
  }

  async fn open_balances(&self) -> Result<Vec<Balance>> {
    self
      .select_balances(
        "HAVING s.quantity - COALESCE(SUM(r.finished_qty + r.damaged_qty), 0) > 0
         ORDER BY s.invoice",
      )
      .await
  }
}

// ─── Shared readers ──────────────────────────────────────────────────────────

impl SqliteStore {
  /// Receipts joined with supply and goods, optionally for one supply
  /// invoice. `tail` is appended verbatim and must be a static ORDER BY.
  async fn select_receipts(
    &self,
    supply_invoice: Option<String>,
    tail: &'static str,
  ) -> Result<Vec<Receipt>> {
    let raws = self
      .conn
      .call(move |conn| {
        let filter = if supply_invoice.is_some() {
          "WHERE s.invoice = ?1"
        } else {
          ""
        };
        let sql = format!(
          "SELECT {RECEIPT_COLUMNS}
           FROM receipts r
           JOIN supplies s ON s.supply_id = r.supply_id
           JOIN goods    g ON g.goods_id  = s.goods_id
           {filter}
           {tail}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = match supply_invoice {
          Some(inv) => stmt
            .query_map(params![inv], RawReceipt::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawReceipt::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawReceipt::into_receipt).collect()
  }

  /// Every supply with summed receipts. `tail` follows the GROUP BY.
  async fn select_balances(&self, tail: &'static str) -> Result<Vec<Balance>> {
    let raws = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {BALANCE_COLUMNS}
           FROM supplies s
           JOIN goods g          ON g.goods_id  = s.goods_id
           LEFT JOIN receipts r  ON r.supply_id = s.supply_id
           GROUP BY s.supply_id
           {tail}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawBalance::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawBalance::into_balance).collect()
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────
//
// These run inside `tokio_rusqlite::Connection::call` and report domain
// failures through `crate::Error` so the closure itself never fails.

fn query_balance(conn: &Connection, invoice: &str) -> rusqlite::Result<Option<RawBalance>> {
  let sql = format!(
    "SELECT {BALANCE_COLUMNS}
     FROM supplies s
     JOIN goods g          ON g.goods_id  = s.goods_id
     LEFT JOIN receipts r  ON r.supply_id = s.supply_id
     WHERE s.invoice = ?1
     GROUP BY s.supply_id"
  );
  conn
    .query_row(&sql, params![invoice], RawBalance::from_row)
    .optional()
}

fn insert_goods(conn: &mut Connection, name: String) -> Result<Goods> {
  let inserted = conn.execute("INSERT INTO goods (name) VALUES (?1)", params![name]);
  match inserted {
    Ok(_) => Ok(Goods { goods_id: conn.last_insert_rowid(), name }),
    Err(e) if is_unique_violation(&e) => Err(CoreError::DuplicateGoods(name).into()),
    Err(e) => Err(e.into()),
  }
}

/// Insert a supply, creating its goods first if needed. Both inserts share
/// one transaction; returning early drops it, which rolls back.
fn insert_supply(conn: &mut Connection, input: NewSupply) -> Result<Supply> {
  let tx = conn.transaction()?;

  let existing: Option<i64> = tx
    .query_row(
      "SELECT goods_id FROM goods WHERE name = ?1",
      params![input.goods_name],
      |row| row.get(0),
    )
    .optional()?;

  let goods_id = match existing {
    Some(id) => id,
    None => {
      tx.execute("INSERT INTO goods (name) VALUES (?1)", params![input.goods_name])?;
      tx.last_insert_rowid()
    }
  };

  let inserted = tx.execute(
    "INSERT INTO supplies (date, invoice, goods_id, quantity) VALUES (?1, ?2, ?3, ?4)",
    params![encode_date(input.date), input.invoice, goods_id, input.quantity],
  );
  match inserted {
    Ok(_) => {}
    Err(e) if is_unique_violation(&e) => {
      return Err(CoreError::DuplicateSupplyInvoice(input.invoice).into());
    }
    Err(e) => return Err(e.into()),
  }
  let supply_id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Supply {
    supply_id,
    date: input.date,
    invoice: input.invoice,
    goods: Goods { goods_id, name: input.goods_name },
    quantity: input.quantity,
  })
}

/// Check the receipt against the current balance and insert it, inside one
/// transaction so the check and the write see the same receipts.
fn insert_receipt(conn: &mut Connection, input: NewReceipt) -> Result<Receipt> {
  let tx = conn.transaction()?;

  let balance = query_balance(&tx, &input.supply_invoice)?
    .ok_or_else(|| CoreError::SupplyNotFound(input.supply_invoice.clone()))?
    .into_balance()?;
  balance.admit(&input)?;

  let inserted = tx.execute(
    "INSERT INTO receipts (
       date, receipt_invoice, supply_id, finished_qty, finished_attr, damaged_qty
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_date(input.date),
      input.receipt_invoice,
      balance.supply.supply_id,
      input.finished_qty,
      input.finished_attr,
      input.damaged_qty,
    ],
  );
  match inserted {
    Ok(_) => {}
    Err(e) if is_unique_violation(&e) => {
      return Err(CoreError::DuplicateReceiptInvoice(input.receipt_invoice).into());
    }
    Err(e) => return Err(e.into()),
  }
  let receipt_id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Receipt {
    receipt_id,
    date: input.date,
    receipt_invoice: input.receipt_invoice,
    supply_invoice: balance.supply.invoice,
    goods: balance.supply.goods,
    finished_qty: input.finished_qty,
    finished_attr: input.finished_attr,
    damaged_qty: input.damaged_qty,
  })
}
