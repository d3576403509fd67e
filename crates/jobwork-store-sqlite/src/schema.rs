//! SQL schema for the jobwork SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Names are compared with the default BINARY collation: 'Widget' and
-- 'widget' are distinct goods.
CREATE TABLE IF NOT EXISTS goods (
    goods_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL UNIQUE
);

-- `quantity` is the dispatched quantity and is never updated.
-- The remaining balance is derived from receipts at read time.
CREATE TABLE IF NOT EXISTS supplies (
    supply_id INTEGER PRIMARY KEY AUTOINCREMENT,
    date      TEXT    NOT NULL,          -- YYYY-MM-DD
    invoice   TEXT    NOT NULL UNIQUE,
    goods_id  INTEGER NOT NULL REFERENCES goods(goods_id),
    quantity  INTEGER NOT NULL CHECK (quantity > 0)
);

-- Receipts are strictly append-only.
CREATE TABLE IF NOT EXISTS receipts (
    receipt_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    date            TEXT    NOT NULL,    -- YYYY-MM-DD
    receipt_invoice TEXT    NOT NULL UNIQUE,
    supply_id       INTEGER NOT NULL REFERENCES supplies(supply_id),
    finished_qty    INTEGER NOT NULL CHECK (finished_qty >= 0),
    finished_attr   TEXT,
    damaged_qty     INTEGER NOT NULL CHECK (damaged_qty >= 0),
    CHECK (finished_qty + damaged_qty > 0)
);

CREATE INDEX IF NOT EXISTS supplies_date_idx  ON supplies(date);
CREATE INDEX IF NOT EXISTS receipts_supply_idx ON receipts(supply_id);
CREATE INDEX IF NOT EXISTS receipts_date_idx   ON receipts(date);

PRAGMA user_version = 1;
";
