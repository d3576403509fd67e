//! Fixed-width plain-text layout, shared by the terminal output and the PDF
//! writer.

use jobwork_core::table::Table;

/// Spaces between columns.
pub const GUTTER: usize = 2;

/// Width in characters of each column: the widest of its header and cells.
pub fn column_widths(table: &Table) -> Vec<usize> {
  let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
  for row in &table.rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }
  widths
}

/// The header line, a dashed rule, then one line per row. Trailing padding is
/// trimmed.
pub fn layout(table: &Table) -> Vec<String> {
  let widths = column_widths(table);
  let mut lines = Vec::with_capacity(table.len() + 2);

  lines.push(line(&table.headers, &widths));
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  lines.push(line(&rule, &widths));
  for row in &table.rows {
    lines.push(line(row, &widths));
  }
  lines
}

/// [`layout`] joined into one newline-terminated string.
pub fn render(table: &Table) -> String {
  let mut out = layout(table).join("\n");
  out.push('\n');
  out
}

fn line(cells: &[String], widths: &[usize]) -> String {
  let mut out = String::new();
  for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
    if i > 0 {
      out.push_str(&" ".repeat(GUTTER));
    }
    out.push_str(cell);
    out.push_str(&" ".repeat(w.saturating_sub(cell.chars().count())));
  }
  out.truncate(out.trim_end().len());
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn layout_aligns_columns() {
    let mut t = Table::new("T", &["Goods", "Qty"]);
    t.push_row(vec!["Widget".into(), "100".into()]);
    t.push_row(vec!["Nut".into(), "7".into()]);

    assert_eq!(render(&t), "\
Goods   Qty
------  ---
Widget  100
Nut     7
");
  }

  #[test]
  fn widths_count_characters_not_bytes() {
    let mut t = Table::new("T", &["A"]);
    t.push_row(vec!["äää".into()]);
    assert_eq!(column_widths(&t), [3]);
  }
}
