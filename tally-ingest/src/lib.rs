//! tally-ingest: tabular statement parsing and row normalization.

pub mod error;
pub mod normalizer;
pub mod table;
pub mod types;

pub use error::IngestError;
pub use normalizer::{normalize_batch, normalize_row};
pub use table::{parse_table, read_table};
pub use types::{RawRow, Table};
