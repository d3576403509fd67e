//! CSV writer.

use jobwork_core::table::Table;

use crate::{Error, Result};

pub fn render(table: &Table) -> Result<Vec<u8>> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  writer.write_record(&table.headers)?;
  for row in &table.rows {
    writer.write_record(row)?;
  }
  writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_then_one_record_per_row() {
    let mut t = Table::new("Receipt", &["Receipt#", "Attribute", "Damaged"]);
    t.push_row(vec!["R1".into(), "red, large".into(), "0".into()]);
    t.push_row(vec!["R2".into(), String::new(), "3".into()]);

    let bytes = render(&t).unwrap();
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(false)
      .from_reader(bytes.as_slice());
    let records: Vec<Vec<String>> = reader
      .records()
      .map(|r| r.unwrap().iter().map(str::to_owned).collect())
      .collect();

    assert_eq!(records.len(), t.len() + 1);
    assert_eq!(records[0], t.headers);
    assert_eq!(records[1..], t.rows[..]);
  }
}
