//! TUI rendering: tab bar, table pane and status bar.

pub mod table_view;

use chrono::Local;
use jobwork_core::store::InventoryStore;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Mode, Tab};

// ─── Root draw ───────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: InventoryStore>(f: &mut Frame, app: &App<S>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tabs
      Constraint::Min(0),    // body
      Constraint::Length(1), // filter
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_tabs(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_filter(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Tabs ────────────────────────────────────────────────────────────────────

fn draw_tabs<S: InventoryStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let mut spans = vec![Span::styled(
    " jobwork ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for (i, tab) in Tab::ALL.iter().enumerate() {
    let style = if *tab == app.tab {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label()), style));
  }

  let date = Local::now().format("%Y-%m-%d ").to_string();
  let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize).saturating_sub(used + date.len());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(Span::styled(date, Style::default().fg(Color::Gray)));

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Body ────────────────────────────────────────────────────────────────────

fn draw_body<S: InventoryStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let pane = app.pane();

  if app.tab == Tab::Bill && app.bill.is_none() {
    draw_empty_bill(f, area);
    return;
  }

  let visible = pane.visible();
  let cursor = Some(pane.cursor);

  if app.tab != Tab::Bill {
    table_view::draw(f, area, &visible, pane.source.len(), pane.sort, cursor);
    return;
  }

  // Bill: the balance on top, the receipts behind it below.
  let parts = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(bill_height(visible.len())), Constraint::Min(0)])
    .split(area);
  table_view::draw(f, parts[0], &visible, pane.source.len(), pane.sort, cursor);
  table_view::draw(
    f,
    parts[1],
    &app.bill_receipts,
    app.bill_receipts.len(),
    None,
    None,
  );
}

/// Rows plus border and header lines, saturating at the largest height.
fn bill_height(rows: usize) -> u16 {
  u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

fn draw_empty_bill(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Bill ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      "Select a supply or open invoice and press Enter.",
      Style::default().fg(Color::DarkGray),
    ))),
    inner,
  );
}

// ─── Filter line ─────────────────────────────────────────────────────────────

fn draw_filter<S: InventoryStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let filter = &app.pane().filter;
  let text = match app.mode {
    Mode::Filter => format!("/{filter}_"),
    Mode::Normal if !filter.is_empty() => format!("/{filter}"),
    Mode::Normal => String::new(),
  };
  f.render_widget(
    Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
    area,
  );
}

// ─── Status bar ──────────────────────────────────────────────────────────────

fn draw_status<S: InventoryStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.mode {
    Mode::Filter => ("FILTER", "Type to filter  Enter keep  Esc clear"),
    Mode::Normal => (
      "NORMAL",
      "1-5/Tab switch  jk move  / filter  s sort  r reverse  Enter bill  x xlsx  p pdf  g reload  q quit",
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let msg_span = Span::styled(
    format!("  {}", app.status_msg),
    Style::default().fg(Color::White),
  );
  let hint_span = Span::styled(format!("  {hints}"), Style::default().fg(Color::Gray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, msg_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
