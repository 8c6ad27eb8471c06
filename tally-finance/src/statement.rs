//! Uploaded statement snapshots.
//!
//! A statement keeps its headers, the total row count, a short sample for
//! previews, and a bounded copy of the rows for import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_core::NormalizedTransaction;
use tally_ingest::{RawRow, Table, normalize_batch, read_table};
use tracing::{debug, warn};

use crate::error::Result;

/// Caps on what a snapshot keeps from the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLimits {
    pub sample_rows: usize,
    pub max_persist_rows: usize,
}

impl Default for StatementLimits {
    fn default() -> Self {
        Self {
            sample_rows: 200,
            max_persist_rows: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Batch id; prefix of every transaction id normalized from this statement
    pub id: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub headers: Vec<String>,
    /// Data rows in the source file, including any that were not kept
    pub row_count: usize,
    #[serde(default)]
    pub sample_rows: Vec<RawRow>,
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

impl Statement {
    pub fn from_table(
        id: impl Into<String>,
        file_name: impl Into<String>,
        table: Table,
        limits: StatementLimits,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        let Table { headers, rows } = table;
        let row_count = rows.len();
        if row_count > limits.max_persist_rows {
            warn!(
                row_count,
                kept = limits.max_persist_rows,
                "statement truncated"
            );
        }

        let sample_rows = rows.iter().take(limits.sample_rows).cloned().collect();
        let mut rows = rows;
        rows.truncate(limits.max_persist_rows);

        Self {
            id: id.into(),
            file_name: file_name.into(),
            uploaded_at,
            headers,
            row_count,
            sample_rows,
            rows,
        }
    }

    /// Read a delimited statement file into a snapshot.
    pub fn read(
        id: impl Into<String>,
        path: impl AsRef<Path>,
        delimiter: u8,
        limits: StatementLimits,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let table = read_table(path, delimiter)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %path.display(), rows = table.rows.len(), "read statement");
        Ok(Self::from_table(id, file_name, table, limits, uploaded_at))
    }

    /// Rows to import: the persisted rows, or the sample when none were kept.
    pub fn rows_for_import(&self) -> &[RawRow] {
        if self.rows.is_empty() {
            &self.sample_rows
        } else {
            &self.rows
        }
    }

    /// Every importable row, normalized under this statement's id.
    pub fn transactions(&self) -> impl Iterator<Item = NormalizedTransaction> + '_ {
        normalize_batch(self.rows_for_import(), &self.id)
    }
}

/// Most recently uploaded statement. Ties go to the earliest in the slice.
pub fn latest(statements: &[Statement]) -> Option<&Statement> {
    statements.iter().fold(None, |best: Option<&Statement>, s| match best {
        Some(b) if b.uploaded_at >= s.uploaded_at => Some(b),
        _ => Some(s),
    })
}
