//! Exporters for jobwork tables.
//!
//! Every exporter transcribes a [`Table`] verbatim: the header row followed by
//! one row per record, each cell exactly as displayed. Pure synchronous; no
//! database dependencies.
//!
//! Documents are rendered fully in memory before anything touches the
//! filesystem, so a failed export never leaves a partial file behind.
//!
//! # Quick start
//!
//! ```no_run
//! use jobwork_core::table::Table;
//! use jobwork_export::{ExportFormat, export};
//!
//! let mut table = Table::new("Goods", &["Goods Name"]);
//! table.push_row(vec!["Widget".into()]);
//! export(&table, ExportFormat::Csv, "goods.csv").unwrap();
//! ```

mod delimited;
pub mod error;
mod pdf;
pub mod text;
#[cfg(feature = "xlsx")]
mod xlsx;

use std::path::Path;

pub use error::{Error, Result};
use jobwork_core::table::Table;

// ─── Public types ────────────────────────────────────────────────────────────

/// A supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
  /// Spreadsheet; needs the `xlsx` feature.
  Xlsx,
  /// Paginated print document.
  Pdf,
  Csv,
}

impl ExportFormat {
  /// The format implied by a file name's extension.
  pub fn from_path(path: &Path) -> Result<Self> {
    path
      .extension()
      .and_then(|e| e.to_str())
      .and_then(|e| e.parse().ok())
      .ok_or_else(|| Error::UnknownFormat(path.to_path_buf()))
  }

  pub fn extension(self) -> &'static str {
    match self {
      Self::Xlsx => "xlsx",
      Self::Pdf => "pdf",
      Self::Csv => "csv",
    }
  }

  /// Whether this build can write the format.
  pub fn is_available(self) -> bool {
    match self {
      Self::Xlsx => cfg!(feature = "xlsx"),
      Self::Pdf | Self::Csv => true,
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Render `table` to the bytes of a complete `format` document.
pub fn render(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
  match format {
    #[cfg(feature = "xlsx")]
    ExportFormat::Xlsx => xlsx::render(table),
    #[cfg(not(feature = "xlsx"))]
    ExportFormat::Xlsx => Err(Error::Unavailable { format, feature: "xlsx" }),
    ExportFormat::Pdf => pdf::render(table),
    ExportFormat::Csv => delimited::render(table),
  }
}

/// Render `table` and write it to `path`.
///
/// Nothing is written unless rendering succeeds.
pub fn export(table: &Table, format: ExportFormat, path: impl AsRef<Path>) -> Result<()> {
  let bytes = render(table, format)?;
  std::fs::write(path, bytes)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_from_extension() {
    assert_eq!(
      ExportFormat::from_path(Path::new("out/Supply.XLSX")).unwrap(),
      ExportFormat::Xlsx
    );
    assert_eq!(
      ExportFormat::from_path(Path::new("bill.pdf")).unwrap(),
      ExportFormat::Pdf
    );
    assert!(matches!(
      ExportFormat::from_path(Path::new("bill.txt")),
      Err(Error::UnknownFormat(_))
    ));
    assert!(matches!(
      ExportFormat::from_path(Path::new("bill")),
      Err(Error::UnknownFormat(_))
    ));
  }

  #[test]
  fn format_parses_and_displays_lowercase() {
    assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    assert_eq!(ExportFormat::Csv.to_string(), "csv");
  }

  #[test]
  fn refused_pdf_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.pdf");
    let mut table = Table::new("T", &["Goods"]);
    table.push_row(vec!["धागा".into()]);

    let err = export(&table, ExportFormat::Pdf, &path).unwrap_err();
    assert!(matches!(err, Error::Unprintable { .. }));
    assert!(!path.exists());
  }

  #[cfg(not(feature = "xlsx"))]
  #[test]
  fn xlsx_without_feature_is_unavailable_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.xlsx");
    let table = Table::new("T", &["A"]);

    let err = export(&table, ExportFormat::Xlsx, &path).unwrap_err();
    assert!(matches!(err, Error::Unavailable { feature: "xlsx", .. }));
    assert!(!path.exists());
    assert!(!ExportFormat::Xlsx.is_available());
  }
}
