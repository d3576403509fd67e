//! Error types for the jobwork exporters.

use std::path::PathBuf;

use thiserror::Error;

use crate::ExportFormat;

#[derive(Debug, Error)]
pub enum Error {
  /// The writer for `format` was compiled out.
  #[error("{format} export is unavailable: rebuild jobwork with the `{feature}` feature enabled")]
  Unavailable {
    format:  ExportFormat,
    feature: &'static str,
  },

  #[error("cannot tell the export format from {0:?}; use a .xlsx, .pdf or .csv file name")]
  UnknownFormat(PathBuf),

  /// The standard PDF fonts have no glyph for `character`.
  #[error("{character:?} in {text:?} cannot be printed in a PDF; export to xlsx or csv instead")]
  Unprintable { character: char, text: String },

  /// `what` would not fit across a PDF page even at the smallest font size.
  #[error(
    "{what} is {width} characters wide but a PDF page holds at most {max}; export to xlsx or \
     csv instead"
  )]
  TooWide {
    what:  String,
    width: usize,
    max:   usize,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[cfg(feature = "xlsx")]
  #[error("xlsx error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
