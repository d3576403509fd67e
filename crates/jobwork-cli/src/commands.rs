//! Subcommands and their handlers.
//!
//! Handlers write tables or JSON to `out` and nothing else; diagnostics go
//! through `tracing` to stderr.

use std::{io::Write, path::PathBuf};

use anyhow::{Context as _, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use jobwork_core::{
  receipt::NewReceipt,
  store::InventoryStore,
  supply::NewSupply,
  table::{SortOrder, Table},
};
use jobwork_export::{ExportFormat, text};
use serde::Serialize;

use crate::{settings::Settings, view::View};

// ─── Arguments ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Goods names.
  Goods {
    #[command(subcommand)]
    action: GoodsCommand,
  },
  /// Dispatches of goods to job workers.
  Supply {
    #[command(subcommand)]
    action: SupplyCommand,
  },
  /// Finished and damaged goods coming back.
  Receipt {
    #[command(subcommand)]
    action: ReceiptCommand,
  },
  /// Supply invoices with something still to come back.
  Open(ListArgs),
  /// One supply invoice as dispatched, or with its current balance.
  Bill {
    #[command(subcommand)]
    kind: BillCommand,
  },
  /// Write a view to an xlsx, pdf or csv file.
  Export(ExportArgs),
  /// Browse the ledger in the terminal.
  Browse,
}

#[derive(Subcommand, Debug)]
pub enum GoodsCommand {
  Add {
    name: String,
  },
  List(ListArgs),
  /// Goods names matching TEXT, prefix matches first.
  Suggest {
    text:  String,
    /// Maximum number of names (default from `suggest_limit`).
    #[arg(long)]
    limit: Option<usize>,
  },
}

#[derive(Subcommand, Debug)]
pub enum SupplyCommand {
  Add {
    #[arg(long)]
    invoice: String,
    /// Created if not yet known.
    #[arg(long)]
    goods:   String,
    #[arg(long)]
    qty:     i64,
    /// Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date:    Option<NaiveDate>,
  },
  List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum ReceiptCommand {
  Add {
    /// This receipt's own invoice number.
    #[arg(long = "receipt")]
    receipt_invoice: String,
    /// Invoice of the supply being received against.
    #[arg(long = "supply")]
    supply_invoice:  String,
    #[arg(long, default_value_t = 0)]
    finished:        i64,
    #[arg(long, default_value_t = 0)]
    damaged:         i64,
    /// Attribute of the finished goods.
    #[arg(long)]
    attr:            Option<String>,
    /// Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date:            Option<NaiveDate>,
  },
  List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum BillCommand {
  Original {
    invoice: String,
    #[arg(long)]
    json:    bool,
  },
  Dynamic {
    invoice: String,
    #[arg(long)]
    json:    bool,
  },
}

/// Row selection shared by listings and exports.
#[derive(Args, Debug, Clone, Default)]
pub struct Arrange {
  /// Keep rows with a cell containing TEXT, ignoring case.
  #[arg(long, value_name = "TEXT")]
  pub filter: Option<String>,
  /// Sort by the column with this header.
  #[arg(long, value_name = "COL")]
  pub sort:   Option<String>,
  /// Sort descending.
  #[arg(long, requires = "sort")]
  pub desc:   bool,
}

impl Arrange {
  /// Indices of the rows of `table` to show, in display order.
  fn indices(&self, table: &Table) -> anyhow::Result<Vec<usize>> {
    let order = if self.desc { SortOrder::Descending } else { SortOrder::Ascending };
    let sort = match &self.sort {
      Some(column) => Some((table.column_index(column)?, order)),
      None => None,
    };
    Ok(table.arrange(self.filter.as_deref().unwrap_or_default(), sort)?)
  }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
  #[command(flatten)]
  pub arrange: Arrange,
  /// Print records as JSON instead of a table.
  #[arg(long)]
  pub json:    bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
  /// supply, receipt, goods, open, original:INV or dynamic:INV
  pub view:    View,
  #[arg(long, value_name = "FILE")]
  pub out:     PathBuf,
  /// Defaults to the extension of FILE.
  #[arg(long)]
  pub format:  Option<ExportFormat>,
  #[command(flatten)]
  pub arrange: Arrange,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Run every command except `browse`, which needs the terminal.
pub async fn run<S: InventoryStore>(
  command: Command,
  store: &S,
  settings: &Settings,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  tracing::debug!(?command, "dispatching");
  match command {
    Command::Goods { action } => goods(action, store, settings, out).await,
    Command::Supply { action } => supply(action, store, out).await,
    Command::Receipt { action } => receipt(action, store, out).await,
    Command::Open(args) => {
      let balances = store.open_balances().await?;
      let table = Table::open_invoices(&balances);
      print_listing(out, &balances, &table, &args)
    }
    Command::Bill { kind } => bill(kind, store, out).await,
    Command::Export(args) => export(args, store, out).await,
    Command::Browse => Err(anyhow!("browse needs an interactive terminal")),
  }
}

async fn goods<S: InventoryStore>(
  action: GoodsCommand,
  store: &S,
  settings: &Settings,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  match action {
    GoodsCommand::Add { name } => {
      let goods = store.add_goods(name).await?;
      writeln!(out, "Added goods {}", goods.name)?;
    }
    GoodsCommand::List(args) => {
      let goods = store.list_goods().await?;
      print_listing(out, &goods, &Table::goods(&goods), &args)?;
    }
    GoodsCommand::Suggest { text, limit } => {
      let limit = limit.unwrap_or(settings.suggest_limit);
      for goods in store.suggest_goods(text, limit).await? {
        writeln!(out, "{}", goods.name)?;
      }
    }
  }
  Ok(())
}

async fn supply<S: InventoryStore>(
  action: SupplyCommand,
  store: &S,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  match action {
    SupplyCommand::Add { invoice, goods, qty, date } => {
      let input = NewSupply::new(date.unwrap_or_else(today), invoice, goods, qty);
      let supply = store.add_supply(input).await?;
      writeln!(
        out,
        "Recorded supply {} ({}, qty {})",
        supply.invoice, supply.goods.name, supply.quantity
      )?;
    }
    SupplyCommand::List(args) => {
      let balances = store.supply_balances().await?;
      print_listing(out, &balances, &Table::supplies(&balances), &args)?;
    }
  }
  Ok(())
}

async fn receipt<S: InventoryStore>(
  action: ReceiptCommand,
  store: &S,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  match action {
    ReceiptCommand::Add {
      receipt_invoice,
      supply_invoice,
      finished,
      damaged,
      attr,
      date,
    } => {
      let mut input = NewReceipt::new(
        date.unwrap_or_else(today),
        receipt_invoice,
        supply_invoice,
        finished,
        damaged,
      );
      if let Some(attr) = attr {
        input = input.with_attr(attr);
      }
      let receipt = store.add_receipt(input).await?;
      let remaining = store
        .balance(receipt.supply_invoice.clone())
        .await?
        .map(|b| b.remaining())
        .unwrap_or_default();

      write!(
        out,
        "Recorded receipt {} against {}: remaining {remaining}",
        receipt.receipt_invoice, receipt.supply_invoice
      )?;
      if remaining == 0 {
        write!(out, " (closed)")?;
      }
      writeln!(out)?;
    }
    ReceiptCommand::List(args) => {
      let receipts = store.list_receipts().await?;
      print_listing(out, &receipts, &Table::receipts(&receipts), &args)?;
    }
  }
  Ok(())
}

async fn bill<S: InventoryStore>(
  kind: BillCommand,
  store: &S,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  match kind {
    BillCommand::Original { invoice, json } => {
      let supply = store
        .get_supply(invoice.clone())
        .await?
        .ok_or_else(|| anyhow!("supply invoice not found: {invoice}"))?;
      if json {
        print_json(out, &supply)
      } else {
        print_table(out, &Table::original_bill(&supply))
      }
    }
    BillCommand::Dynamic { invoice, json } => {
      let balance = store
        .balance(invoice.clone())
        .await?
        .ok_or_else(|| anyhow!("supply invoice not found: {invoice}"))?;
      if json {
        print_json(out, &balance)
      } else {
        print_table(out, &Table::dynamic_bill(&balance))
      }
    }
  }
}

async fn export<S: InventoryStore>(
  args: ExportArgs,
  store: &S,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  let format = match args.format {
    Some(format) => format,
    None => ExportFormat::from_path(&args.out)?,
  };
  let table = args.view.load(store).await?;
  let table = table.select(&args.arrange.indices(&table)?);

  jobwork_export::export(&table, format, &args.out)
    .with_context(|| format!("failed to export to {}", args.out.display()))?;
  tracing::info!(view = ?args.view, %format, path = %args.out.display(), "exported");
  writeln!(out, "Exported {} rows to {}", table.len(), args.out.display())?;
  Ok(())
}

// ─── Output ──────────────────────────────────────────────────────────────────

fn today() -> NaiveDate { Local::now().date_naive() }

/// Print `table` arranged by `args`, or the matching `records` as JSON.
/// `records[i]` is the record behind `table.rows[i]`.
fn print_listing<T: Serialize>(
  out: &mut impl Write,
  records: &[T],
  table: &Table,
  args: &ListArgs,
) -> anyhow::Result<()> {
  let indices = args.arrange.indices(table)?;
  if args.json {
    let picked: Vec<&T> = indices.iter().filter_map(|&i| records.get(i)).collect();
    print_json(out, &picked)
  } else {
    print_table(out, &table.select(&indices))
  }
}

fn print_table(out: &mut impl Write, table: &Table) -> anyhow::Result<()> {
  out.write_all(text::render(table).as_bytes())?;
  Ok(())
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
  serde_json::to_writer_pretty(&mut *out, value)?;
  writeln!(out)?;
  Ok(())
}
