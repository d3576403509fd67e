//! Goods: the master list of item names that supplies and receipts refer to.
//!
//! Names are unique and compared case-sensitively in storage. Autocomplete
//! ([`suggest`]) matches case-insensitively.

use serde::{Deserialize, Serialize};

use crate::{Result, error::required};

/// A goods master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goods {
  pub goods_id: i64,
  pub name:     String,
}

/// Validate and normalise a user-typed goods name.
pub fn normalize_name(raw: &str) -> Result<String> { required("goods name", raw) }

/// Autocomplete candidates for `typed`, best first.
///
/// Names that start with `typed` (ignoring case) rank ahead of names that
/// merely contain it. Within each group the input order is kept, so callers
/// pass goods already sorted by name. Empty input suggests nothing.
pub fn suggest<'a, I>(goods: I, typed: &str, limit: usize) -> Vec<&'a Goods>
where
  I: IntoIterator<Item = &'a Goods>,
{
  let needle = typed.trim().to_lowercase();
  if needle.is_empty() || limit == 0 {
    return Vec::new();
  }

  let mut prefixed = Vec::new();
  let mut contained = Vec::new();
  for g in goods {
    let name = g.name.to_lowercase();
    if name.starts_with(&needle) {
      prefixed.push(g);
    } else if name.contains(&needle) {
      contained.push(g);
    }
  }

  prefixed.extend(contained);
  prefixed.truncate(limit);
  prefixed
}
