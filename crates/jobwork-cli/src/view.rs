//! Named views over the store, as accepted by `jobwork export`.

use std::str::FromStr;

use anyhow::{Context as _, anyhow, bail};
use jobwork_core::{store::InventoryStore, table::Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
  Supply,
  Receipt,
  Goods,
  Open,
  Original(String),
  Dynamic(String),
}

impl FromStr for View {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (name, invoice) = match s.split_once(':') {
      Some((name, invoice)) => (name, Some(invoice.trim())),
      None => (s, None),
    };
    let view = match (name.trim().to_ascii_lowercase().as_str(), invoice) {
      ("supply", None) => Self::Supply,
      ("receipt", None) => Self::Receipt,
      ("goods", None) => Self::Goods,
      ("open", None) => Self::Open,
      ("original" | "dynamic", None | Some("")) => {
        bail!("view `{name}` needs an invoice, e.g. `{name}:INV1`")
      }
      ("original", Some(inv)) => Self::Original(inv.to_owned()),
      ("dynamic", Some(inv)) => Self::Dynamic(inv.to_owned()),
      _ => bail!(
        "unknown view `{s}`; expected supply, receipt, goods, open, original:INV or dynamic:INV"
      ),
    };
    Ok(view)
  }
}

impl View {
  /// Build the table this view names.
  pub async fn load<S: InventoryStore>(&self, store: &S) -> anyhow::Result<Table> {
    let table = match self {
      Self::Supply => Table::supplies(&store.supply_balances().await?),
      Self::Receipt => Table::receipts(&store.list_receipts().await?),
      Self::Goods => Table::goods(&store.list_goods().await?),
      Self::Open => Table::open_invoices(&store.open_balances().await?),
      Self::Original(inv) => {
        let supply = store
          .get_supply(inv.clone())
          .await
          .with_context(|| format!("failed to load supply {inv}"))?
          .ok_or_else(|| anyhow!("supply invoice not found: {inv}"))?;
        Table::original_bill(&supply)
      }
      Self::Dynamic(inv) => {
        let balance = store
          .balance(inv.clone())
          .await
          .with_context(|| format!("failed to load supply {inv}"))?
          .ok_or_else(|| anyhow!("supply invoice not found: {inv}"))?;
        Table::dynamic_bill(&balance)
      }
    };
    Ok(table)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_views_parse_ignoring_case() {
    assert_eq!("supply".parse::<View>().unwrap(), View::Supply);
    assert_eq!("Receipt".parse::<View>().unwrap(), View::Receipt);
    assert_eq!("GOODS".parse::<View>().unwrap(), View::Goods);
    assert_eq!("open".parse::<View>().unwrap(), View::Open);
  }

  #[test]
  fn bills_carry_their_invoice() {
    assert_eq!(
      "original:INV1".parse::<View>().unwrap(),
      View::Original("INV1".into())
    );
    assert_eq!(
      "dynamic: INV 2".parse::<View>().unwrap(),
      View::Dynamic("INV 2".into())
    );
  }

  #[test]
  fn malformed_views_are_rejected() {
    assert!("dynamic".parse::<View>().is_err());
    assert!("original:".parse::<View>().is_err());
    assert!("supply:INV1".parse::<View>().is_err());
    assert!("bills".parse::<View>().is_err());
  }
}
