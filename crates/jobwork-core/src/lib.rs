//! Core types and trait definitions for the jobwork inventory tracker.
//!
//! Free of database, terminal and file-format dependencies. All other crates
//! depend on it.

pub mod balance;
pub mod error;
pub mod goods;
pub mod receipt;
pub mod store;
pub mod supply;
pub mod table;

pub use error::{Error, Result};
