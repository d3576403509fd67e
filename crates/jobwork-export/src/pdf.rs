//! Paginated print document writer.
//!
//! Emits a minimal PDF 1.4 file: A4 portrait pages of monospaced text using
//! the standard Courier fonts, so no font data has to be embedded. The title
//! and the header row repeat on every page and each page carries a
//! "Page i of n" footer. The font shrinks until the widest line fits the
//! page. A table still too wide at the smallest size is split into groups of
//! whole columns, each printed on its own run of pages; cells are never cut.
//!
//! The standard fonts only cover Latin-1, so text outside it is refused
//! rather than printed as something else.

use std::{fmt::Write as _, iter, ops::Range};

use jobwork_core::table::Table;

use crate::{
  error::{Error, Result},
  text::{self, GUTTER},
};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;

const MAX_FONT_SIZE: f32 = 10.0;
const MIN_FONT_SIZE: f32 = 4.0;
/// Advance width of every Courier glyph, in ems.
const COURIER_ADVANCE: f32 = 0.6;
const LEADING: f32 = 1.25;

/// Lines on each page that are not body rows: title, blank, header, rule,
/// blank before the footer, footer.
const FIXED_LINES: usize = 6;

// Object numbers. Pages follow as (page, content) pairs from `FIRST_PAGE`.
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const FIRST_PAGE: usize = 5;

pub fn render(table: &Table) -> Result<Vec<u8>> {
  check_printable(table)?;

  let max = max_line_chars();
  let title_width = table.title.chars().count();
  if title_width > max {
    return Err(Error::TooWide { what: "the title".into(), width: title_width, max });
  }

  let widths = text::column_widths(table);
  let sheets: Vec<Sheet> = column_groups(&table.headers, &widths, max)?
    .into_iter()
    .map(|columns| Sheet::new(&table.title, text::layout(&project(table, columns))))
    .collect();
  let pages: Vec<Page> = sheets.iter().flat_map(|s| s.pages(&table.title)).collect();

  let mut doc = Document::new(FIRST_PAGE + 2 * pages.len() - 1);

  doc.object(CATALOG, format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes());

  let kids: Vec<String> = (0..pages.len())
    .map(|i| format!("{} 0 R", page_object(i)))
    .collect();
  doc.object(
    PAGES,
    format!(
      "<< /Type /Pages /Kids [{}] /Count {} >>",
      kids.join(" "),
      pages.len()
    )
    .as_bytes(),
  );

  doc.object(FONT_REGULAR, font("Courier").as_bytes());
  doc.object(FONT_BOLD, font("Courier-Bold").as_bytes());

  for (i, page) in pages.iter().enumerate() {
    let content = page.content(i + 1, pages.len());

    doc.object(
      page_object(i),
      format!(
        "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
         /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R >> >> \
         /Contents {} 0 R >>",
        page_object(i) + 1
      )
      .as_bytes(),
    );

    let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    stream.extend_from_slice(&content);
    stream.extend_from_slice(b"\nendstream");
    doc.object(page_object(i) + 1, &stream);
  }

  Ok(doc.finish())
}

fn page_object(index: usize) -> usize { FIRST_PAGE + 2 * index }

fn font(base: &str) -> String {
  format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
}

/// The largest font size, within bounds, at which `chars` columns fit.
fn fit_font_size(chars: usize) -> f32 {
  if chars == 0 {
    return MAX_FONT_SIZE;
  }
  let fit = (PAGE_WIDTH - 2.0 * MARGIN) / (chars as f32 * COURIER_ADVANCE);
  fit.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Longest line, in characters, that fits across the page at the smallest
/// font size.
fn max_line_chars() -> usize {
  ((PAGE_WIDTH - 2.0 * MARGIN) / (MIN_FONT_SIZE * COURIER_ADVANCE)) as usize
}

// ─── Input checks ────────────────────────────────────────────────────────────

/// Whether WinAnsiEncoding prints `c` as itself.
fn printable(c: char) -> bool { matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}') }

fn check_printable(table: &Table) -> Result<()> {
  let texts = iter::once(&table.title)
    .chain(&table.headers)
    .chain(table.rows.iter().flatten());
  for text in texts {
    if let Some(character) = text.chars().find(|c| !printable(*c)) {
      return Err(Error::Unprintable { character, text: text.clone() });
    }
  }
  Ok(())
}

// ─── Column groups ───────────────────────────────────────────────────────────

/// Split the columns, in order, into runs whose laid-out lines are at most
/// `max` characters. A column wider than `max` on its own is an error.
fn column_groups(headers: &[String], widths: &[usize], max: usize) -> Result<Vec<Range<usize>>> {
  let mut groups = Vec::new();
  let mut start = 0;
  let mut used = 0;
  for (i, &width) in widths.iter().enumerate() {
    if width > max {
      let name = headers.get(i).map(String::as_str).unwrap_or_default();
      return Err(Error::TooWide { what: format!("column {name:?}"), width, max });
    }
    if i == start {
      used = width;
    } else if used + GUTTER + width > max {
      groups.push(start..i);
      start = i;
      used = width;
    } else {
      used += GUTTER + width;
    }
  }
  groups.push(start..widths.len());
  Ok(groups)
}

/// The same table restricted to `columns`.
fn project(table: &Table, columns: Range<usize>) -> Table {
  let slice = |cells: &[String]| {
    cells
      .get(columns.clone())
      .map(<[String]>::to_vec)
      .unwrap_or_default()
  };
  Table {
    title:   table.title.clone(),
    headers: slice(&table.headers),
    rows:    table.rows.iter().map(|row| slice(row)).collect(),
  }
}

// ─── Page content ────────────────────────────────────────────────────────────

/// One column group laid out as text: header, rule, then body lines.
struct Sheet {
  lines:     Vec<String>,
  font_size: f32,
}

impl Sheet {
  fn new(title: &str, lines: Vec<String>) -> Self {
    let widest = lines
      .iter()
      .map(|l| l.chars().count())
      .chain(iter::once(title.chars().count()))
      .max()
      .unwrap_or(0);
    Self { lines, font_size: fit_font_size(widest) }
  }

  fn pages<'a>(&'a self, title: &'a str) -> Vec<Page<'a>> {
    let leading = self.font_size * LEADING;
    let per_page = (((PAGE_HEIGHT - 2.0 * MARGIN) / leading) as usize)
      .saturating_sub(FIXED_LINES)
      .max(1);
    let (head, body) = self.lines.split_at(self.lines.len().min(2));
    let chunks: Vec<&[String]> = if body.is_empty() {
      vec![body]
    } else {
      body.chunks(per_page).collect()
    };
    chunks
      .into_iter()
      .map(|rows| Page { title, head, rows, font_size: self.font_size, leading })
      .collect()
  }
}

struct Page<'a> {
  title:     &'a str,
  head:      &'a [String],
  rows:      &'a [String],
  font_size: f32,
  leading:   f32,
}

impl Page<'_> {
  fn content(&self, number: usize, count: usize) -> Vec<u8> {
    let size = self.font_size;
    let top = PAGE_HEIGHT - MARGIN - size;
    let mut out = Vec::new();

    push(
      &mut out,
      &format!("BT\n/F2 {size:.2} Tf\n{:.2} TL\n{MARGIN} {top:.2} Td\n", self.leading),
    );
    show(&mut out, self.title);
    push(&mut out, "T*\n");
    for line in self.head {
      push(&mut out, "T*\n");
      show(&mut out, line);
    }
    push(&mut out, &format!("/F1 {size:.2} Tf\n"));
    for line in self.rows {
      push(&mut out, "T*\n");
      show(&mut out, line);
    }
    push(&mut out, "ET\n");

    push(&mut out, &format!("BT\n/F1 {size:.2} Tf\n{MARGIN} {MARGIN} Td\n"));
    show(&mut out, &format!("Page {number} of {count}"));
    push(&mut out, "ET");
    out
  }
}

fn push(out: &mut Vec<u8>, s: &str) { out.extend_from_slice(s.as_bytes()); }

/// Append `(text) Tj` with `text` escaped and encoded as Latin-1. Every
/// character must pass [`printable`].
fn show(out: &mut Vec<u8>, text: &str) {
  out.push(b'(');
  for c in text.chars() {
    debug_assert!(printable(c), "{c:?} reached the PDF writer");
    if matches!(c, '(' | ')' | '\\') {
      out.push(b'\\');
    }
    out.push(c as u32 as u8);
  }
  out.extend_from_slice(b") Tj\n");
}

// ─── File structure ──────────────────────────────────────────────────────────

/// Accumulates numbered objects and records their byte offsets for the
/// cross-reference table.
struct Document {
  buf:     Vec<u8>,
  offsets: Vec<usize>,
}

impl Document {
  fn new(objects: usize) -> Self {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
    Self { buf, offsets: vec![0; objects] }
  }

  fn object(&mut self, id: usize, body: &[u8]) {
    self.offsets[id - 1] = self.buf.len();
    self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    self.buf.extend_from_slice(body);
    self.buf.extend_from_slice(b"\nendobj\n");
  }

  fn finish(mut self) -> Vec<u8> {
    let xref = self.buf.len();
    let mut tail = String::new();
    let _ = writeln!(tail, "xref\n0 {}", self.offsets.len() + 1);
    tail.push_str("0000000000 65535 f \n");
    for offset in &self.offsets {
      let _ = writeln!(tail, "{offset:010} 00000 n ");
    }
    let _ = write!(
      tail,
      "trailer\n<< /Size {} /Root {CATALOG} 0 R >>\nstartxref\n{xref}\n%%EOF\n",
      self.offsets.len() + 1
    );
    self.buf.extend_from_slice(tail.as_bytes());
    self.buf
  }
}
