//! Delimited-text statement reader.
//!
//! The first record is the header row. Cells are trimmed, blank lines are
//! skipped, and rows are padded or cut to the header width so every
//! `RawRow` carries exactly the header's columns.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::types::{RawRow, Table};

fn header_names(record: &StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("col_{i}")
            } else {
                h.to_string()
            }
        })
        .collect()
}

/// Parse a statement from any reader.
pub fn parse_reader<R: Read>(reader: R, delimiter: u8) -> Result<Table, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = rdr.records();

    let headers = match records.next() {
        Some(first) => header_names(&first?),
        None => return Ok(Table::default()),
    };

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for result in records {
        let record = result?;
        if record.len() != headers.len() {
            ragged += 1;
        }
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    if ragged > 0 {
        warn!(ragged, columns = headers.len(), "rows did not match header width");
    }
    debug!(columns = headers.len(), rows = rows.len(), "parsed statement table");

    Ok(Table { headers, rows })
}

/// Parse statement text.
pub fn parse_table(text: &str, delimiter: u8) -> Result<Table, IngestError> {
    parse_reader(text.as_bytes(), delimiter)
}

/// Read and parse a statement file.
pub fn read_table(path: impl AsRef<Path>, delimiter: u8) -> Result<Table, IngestError> {
    let file = File::open(path.as_ref())?;
    parse_reader(file, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_statement() {
        let text = "Date, Narration ,Debit,Credit\r\n2024-01-05,Rent,1200,\r\n2024-01-06,Salary,,50000\r\n";
        let table = parse_table(text, b',').unwrap();

        assert_eq!(table.headers, vec!["Date", "Narration", "Debit", "Credit"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Narration"), Some("Rent"));
        assert_eq!(table.rows[0].get("Credit"), Some(""));
        assert_eq!(table.rows[1].get("Credit"), Some("50000"));
    }

    #[test]
    fn test_quoted_fields() {
        let text = "Date,Description,Amount\n2024-01-05,\"Coffee, \"\"large\"\"\",\"1,234.50\"\n";
        let table = parse_table(text, b',').unwrap();
        assert_eq!(table.rows[0].get("Description"), Some("Coffee, \"large\""));
        assert_eq!(table.rows[0].get("Amount"), Some("1,234.50"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "\nDate,Amount\n\n2024-01-05,10\n\n2024-01-06,20\n";
        let table = parse_table(text, b',').unwrap();
        assert_eq!(table.headers, vec!["Date", "Amount"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_empty_headers_named_by_position() {
        let table = parse_table("Date,,Amount\n2024-01-05,x,10\n", b',').unwrap();
        assert_eq!(table.headers, vec!["Date", "col_1", "Amount"]);
        assert_eq!(table.rows[0].get("col_1"), Some("x"));
    }

    #[test]
    fn test_short_and_long_rows() {
        let table = parse_table("Date,Amount,Category\n2024-01-05\n2024-01-06,5,Food,extra\n", b',').unwrap();
        assert_eq!(table.rows[0].get("Amount"), Some(""));
        assert_eq!(table.rows[0].get("Category"), Some(""));
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.rows[1].get("Category"), Some("Food"));
    }

    #[test]
    fn test_empty_input() {
        let table = parse_table("", b',').unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_tab_delimited() {
        let table = parse_table("Date\tAmount\n2024-01-05\t10\n", b'\t').unwrap();
        assert_eq!(table.rows[0].get("Amount"), Some("10"));
    }

    #[test]
    fn test_read_table_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "Txn_Date,Amount").unwrap();
        writeln!(f, "2024-02-01,99").unwrap();

        let table = read_table(f.path(), b',').unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Txn_Date"), Some("2024-02-01"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_table("/definitely/not/here.csv", b',').unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
