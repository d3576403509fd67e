//! Scrollable table pane.

use jobwork_core::table::{SortOrder, Table};
use jobwork_export::text;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Row, Table as TableWidget, TableState},
};

/// Render `table` into `area` with the row at `cursor` highlighted.
///
/// `sort` marks the sorted column header with an arrow; `None` for cursor
/// draws no highlight.
pub fn draw(
  f: &mut Frame,
  area: Rect,
  table: &Table,
  total: usize,
  sort: Option<(usize, SortOrder)>,
  cursor: Option<usize>,
) {
  let title = if table.len() == total {
    format!(" {} ({total}) ", table.title)
  } else {
    format!(" {} ({}/{total}) ", table.title, table.len())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let header = Row::new(table.headers.iter().enumerate().map(|(i, h)| {
    let marker = match sort {
      Some((col, SortOrder::Ascending)) if col == i => " ▲",
      Some((col, SortOrder::Descending)) if col == i => " ▼",
      _ => "",
    };
    Cell::from(format!("{h}{marker}"))
  }))
  .style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let rows = table
    .rows
    .iter()
    .map(|row| Row::new(row.iter().map(|c| Cell::from(Line::from(c.as_str())))));

  // Room for the sort arrow on every header.
  let widths: Vec<Constraint> = text::column_widths(table)
    .into_iter()
    .map(|w| Constraint::Length(w as u16 + 2))
    .collect();

  let widget = TableWidget::new(rows, widths)
    .header(header)
    .block(block)
    .column_spacing(text::GUTTER as u16)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default();
  state.select(cursor.filter(|_| !table.is_empty()));
  f.render_stateful_widget(widget, area, &mut state);
}
