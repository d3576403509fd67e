//! Terminal browser state machine and key dispatcher.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use jobwork_core::{
  store::InventoryStore,
  table::{SortOrder, Table},
};
use jobwork_export::ExportFormat;

// ─── Tab ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Supply,
  Receipt,
  Goods,
  Open,
  Bill,
}

impl Tab {
  pub const ALL: [Tab; 5] = [Tab::Supply, Tab::Receipt, Tab::Goods, Tab::Open, Tab::Bill];

  pub fn index(self) -> usize {
    Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
  }

  pub fn label(self) -> &'static str {
    match self {
      Tab::Supply => "Supply",
      Tab::Receipt => "Receipt",
      Tab::Goods => "Goods",
      Tab::Open => "Open",
      Tab::Bill => "Bill",
    }
  }

  fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

  fn prev(self) -> Self { Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()] }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Keystrokes edit the filter of the current tab.
  Filter,
}

// ─── Pane ────────────────────────────────────────────────────────────────────

/// One tab's table and how the user has arranged it.
#[derive(Debug, Clone)]
pub struct Pane {
  pub source: Table,
  pub filter: String,
  /// Sort column and direction; `None` keeps store order.
  pub sort:   Option<(usize, SortOrder)>,
  /// Cursor within the visible rows.
  pub cursor: usize,
}

impl Pane {
  fn new(source: Table) -> Self {
    Self { source, filter: String::new(), sort: None, cursor: 0 }
  }

  /// The rows currently shown, filtered then sorted.
  pub fn visible(&self) -> Table {
    let indices = self
      .source
      .arrange(&self.filter, self.sort)
      .unwrap_or_else(|_| self.source.matching(&self.filter));
    self.source.select(&indices)
  }

  /// Swap in fresh data, keeping the filter and sort.
  fn replace(&mut self, source: Table) {
    if source.headers != self.source.headers {
      self.sort = None;
    }
    self.source = source;
    self.clamp_cursor();
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  /// Next sort column, wrapping back to store order after the last one.
  fn cycle_sort(&mut self) {
    self.sort = match self.sort {
      None if self.source.width() > 0 => Some((0, SortOrder::Ascending)),
      Some((col, order)) if col + 1 < self.source.width() => Some((col + 1, order)),
      _ => None,
    };
  }

  fn reverse(&mut self) {
    self.sort = match self.sort {
      Some((col, order)) => Some((col, order.reversed())),
      None if self.source.width() > 0 => Some((0, SortOrder::Descending)),
      None => None,
    };
  }

  /// The cell under the cursor in the column named `header`.
  fn cursor_cell(&self, header: &str) -> Option<String> {
    let visible = self.visible();
    let col = visible.column_index(header).ok()?;
    visible.rows.get(self.cursor).map(|row| row[col].clone())
  }
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level browser state.
pub struct App<S> {
  pub store:         S,
  pub export_dir:    PathBuf,
  pub tab:           Tab,
  pub mode:          Mode,
  pub panes:         [Pane; 5],
  /// Supply invoice shown in the Bill tab.
  pub bill:          Option<String>,
  /// Receipts posted against `bill`, shown under it.
  pub bill_receipts: Table,
  /// Result of the last action, shown in the status bar.
  pub status_msg:    String,
}

impl<S: InventoryStore> App<S> {
  pub fn new(store: S, export_dir: PathBuf) -> Self {
    let empty = |t: Tab| Pane::new(Table::new(t.label(), &[]));
    Self {
      store,
      export_dir,
      tab: Tab::Supply,
      mode: Mode::Normal,
      panes: Tab::ALL.map(empty),
      bill: None,
      bill_receipts: Table::receipts(&[]),
      status_msg: String::new(),
    }
  }

  pub fn pane(&self) -> &Pane { &self.panes[self.tab.index()] }

  fn pane_mut(&mut self) -> &mut Pane { &mut self.panes[self.tab.index()] }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Reload every tab from the store.
  pub async fn reload(&mut self) -> anyhow::Result<()> {
    let supplies = Table::supplies(&self.store.supply_balances().await?);
    let receipts = Table::receipts(&self.store.list_receipts().await?);
    let goods = Table::goods(&self.store.list_goods().await?);
    let open = Table::open_invoices(&self.store.open_balances().await?);

    self.panes[Tab::Supply.index()].replace(supplies);
    self.panes[Tab::Receipt.index()].replace(receipts);
    self.panes[Tab::Goods.index()].replace(goods);
    self.panes[Tab::Open.index()].replace(open);

    if let Some(invoice) = self.bill.clone() {
      self.load_bill(invoice).await?;
    }
    Ok(())
  }

  /// Show the dynamic bill of `invoice` in the Bill tab.
  async fn load_bill(&mut self, invoice: String) -> anyhow::Result<()> {
    let balance = self
      .store
      .balance(invoice.clone())
      .await?
      .ok_or_else(|| anyhow::anyhow!("supply invoice not found: {invoice}"))?;
    let receipts = self.store.receipts_for(invoice.clone()).await?;

    self.panes[Tab::Bill.index()].replace(Table::dynamic_bill(&balance));
    self.bill_receipts = Table::receipts(&receipts);
    self.bill = Some(invoice);
    Ok(())
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `false` to quit.
  ///
  /// Failures end up in the status bar; the browser keeps running.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    let result = match self.mode {
      Mode::Filter => {
        self.handle_filter_key(key);
        Ok(true)
      }
      Mode::Normal => self.handle_normal_key(key).await,
    };
    match result {
      Ok(cont) => cont,
      Err(e) => {
        tracing::debug!(error = %e, "browser action failed");
        self.status_msg = format!("Error: {e:#}");
        true
      }
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    let pane = self.pane_mut();
    match key.code {
      KeyCode::Esc => {
        pane.filter.clear();
        self.mode = Mode::Normal;
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        pane.filter.pop();
      }
      KeyCode::Char(c) => pane.filter.push(c),
      _ => {}
    }
    self.pane_mut().clamp_cursor();
  }

  async fn handle_normal_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Tabs
      KeyCode::Tab => self.tab = self.tab.next(),
      KeyCode::BackTab => self.tab = self.tab.prev(),
      KeyCode::Char(c @ '1'..='5') => {
        self.tab = Tab::ALL[c as usize - '1' as usize];
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.pane().visible().len();
        let pane = self.pane_mut();
        if pane.cursor + 1 < len {
          pane.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        let pane = self.pane_mut();
        pane.cursor = pane.cursor.saturating_sub(1);
      }

      // Arrangement
      KeyCode::Char('/') => {
        self.mode = Mode::Filter;
        self.pane_mut().cursor = 0;
      }
      KeyCode::Char('s') => {
        self.pane_mut().cycle_sort();
        self.status_msg = self.sort_description();
      }
      KeyCode::Char('r') => {
        self.pane_mut().reverse();
        self.status_msg = self.sort_description();
      }

      // Actions
      KeyCode::Enter if matches!(self.tab, Tab::Supply | Tab::Open) => {
        if let Some(invoice) = self.pane().cursor_cell("Invoice") {
          self.load_bill(invoice.clone()).await?;
          self.tab = Tab::Bill;
          self.status_msg = format!("Bill for {invoice}");
        }
      }
      KeyCode::Char('x') => self.export_visible(ExportFormat::Xlsx)?,
      KeyCode::Char('p') => self.export_visible(ExportFormat::Pdf)?,
      KeyCode::Char('g') => {
        self.reload().await?;
        self.status_msg = "Reloaded".into();
      }

      _ => {}
    }
    Ok(true)
  }

  fn sort_description(&self) -> String {
    let pane = self.pane();
    match pane.sort {
      Some((col, order)) => format!("Sorted by {} ({order})", pane.source.headers[col]),
      None => "Store order".into(),
    }
  }

  /// Write the visible table of the current tab into the export directory.
  fn export_visible(&mut self, format: ExportFormat) -> anyhow::Result<()> {
    let table = self.pane().visible();
    let path = self.export_dir.join(export_file_name(&table.title, format));
    jobwork_export::export(&table, format, &path)?;
    tracing::info!(%format, path = %path.display(), "exported");
    self.status_msg = format!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
  }
}

/// `Dynamic INV/7` becomes `Dynamic_INV_7.pdf`.
fn export_file_name(title: &str, format: ExportFormat) -> String {
  let stem: String = title
    .chars()
    .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
    .collect();
  format!("{stem}.{}", format.extension())
}
