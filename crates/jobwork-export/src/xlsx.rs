//! Spreadsheet writer.
//!
//! One worksheet named after the table, a bold frozen header row, then every
//! cell written as a string so the sheet reads exactly like the screen.

use jobwork_core::table::Table;
use rust_xlsxwriter::{Format, Workbook};

use crate::{Result, text};

/// Excel refuses sheet names longer than this.
const MAX_SHEET_NAME: usize = 31;

pub fn render(table: &Table) -> Result<Vec<u8>> {
  let mut workbook = Workbook::new();
  let bold = Format::new().set_bold();

  let sheet = workbook.add_worksheet();
  sheet.set_name(sheet_name(&table.title))?;

  for (col, header) in table.headers.iter().enumerate() {
    sheet.write_string_with_format(0, col as u16, header, &bold)?;
  }
  for (r, row) in table.rows.iter().enumerate() {
    for (c, cell) in row.iter().enumerate() {
      sheet.write_string(r as u32 + 1, c as u16, cell)?;
    }
  }

  // Roughly one Excel width unit per character, plus some breathing room.
  for (col, width) in text::column_widths(table).into_iter().enumerate() {
    sheet.set_column_width(col as u16, width as f64 + 2.0)?;
  }
  sheet.set_freeze_panes(1, 0)?;

  Ok(workbook.save_to_buffer()?)
}

/// `title` with the characters Excel forbids removed and the length capped.
fn sheet_name(title: &str) -> String {
  let cleaned: String = title
    .chars()
    .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
    .take(MAX_SHEET_NAME)
    .collect();
  let cleaned = cleaned.trim().trim_matches('\'').trim();
  if cleaned.is_empty() {
    "Sheet1".to_owned()
  } else {
    cleaned.to_owned()
  }
}
