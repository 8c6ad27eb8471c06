//! Statement import: normalize, then keep only rows worth persisting.

use serde::{Deserialize, Serialize};
use tally_core::NormalizedTransaction;
use tally_ingest::normalize_row;
use tracing::{debug, info};

use crate::statement::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPolicy {
    /// Rows considered per import, taken from the top of the statement
    pub max_rows: usize,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self { max_rows: 200 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    MissingDate,
    /// Zero or unparseable amount
    ZeroAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub statement_id: String,
    pub accepted: Vec<NormalizedTransaction>,
    pub skipped: Vec<SkippedRow>,
}

fn check(txn: &NormalizedTransaction) -> Option<SkipReason> {
    if txn.date.is_empty() {
        Some(SkipReason::MissingDate)
    } else if txn.amount == 0.0 {
        Some(SkipReason::ZeroAmount)
    } else {
        None
    }
}

/// Import the first `policy.max_rows` rows of a statement.
///
/// Ids are `{statement_id}_{row_index}`, so importing the same file again
/// under a fresh statement id yields new records; nothing is deduplicated.
pub fn import_statement(statement: &Statement, policy: ImportPolicy) -> ImportOutcome {
    let mut outcome = ImportOutcome {
        statement_id: statement.id.clone(),
        ..Default::default()
    };

    for (i, row) in statement
        .rows_for_import()
        .iter()
        .take(policy.max_rows)
        .enumerate()
    {
        let txn = normalize_row(row, i, &statement.id);
        match check(&txn) {
            None => outcome.accepted.push(txn),
            Some(reason) => {
                debug!(row_index = i, ?reason, "skipping statement row");
                outcome.skipped.push(SkippedRow { row_index: i, reason });
            }
        }
    }

    info!(
        statement = %statement.id,
        accepted = outcome.accepted.len(),
        skipped = outcome.skipped.len(),
        "imported statement"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementLimits;
    use chrono::Utc;
    use tally_ingest::parse_table;

    fn statement(text: &str) -> Statement {
        let table = parse_table(text, b',').unwrap();
        Statement::from_table("stmt1", "s.csv", table, StatementLimits::default(), Utc::now())
    }

    #[test]
    fn test_filters_missing_date_and_zero_amount() {
        let s = statement(
            "Date,Amount,Description\n\
             2024-01-01,10,ok\n\
             ,20,no date\n\
             2024-01-03,abc,bad amount\n\
             2024-01-04,0,zero\n\
             2024-01-05,-5,refund\n",
        );

        let out = import_statement(&s, ImportPolicy::default());

        let ids: Vec<_> = out.accepted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["stmt1_0", "stmt1_4"]);
        assert_eq!(
            out.skipped,
            vec![
                SkippedRow { row_index: 1, reason: SkipReason::MissingDate },
                SkippedRow { row_index: 2, reason: SkipReason::ZeroAmount },
                SkippedRow { row_index: 3, reason: SkipReason::ZeroAmount },
            ]
        );
        assert_eq!(out.statement_id, "stmt1");
    }

    #[test]
    fn test_respects_row_cap() {
        let mut text = String::from("Date,Amount\n");
        for i in 0..50 {
            text.push_str(&format!("2024-01-01,{}\n", i + 1));
        }
        let s = statement(&text);

        let out = import_statement(&s, ImportPolicy { max_rows: 20 });
        assert_eq!(out.accepted.len(), 20);
        assert_eq!(out.accepted.last().unwrap().id, "stmt1_19");
    }

    #[test]
    fn test_uses_debit_credit_inference() {
        let s = statement("Date,Debit,Credit\n2024-01-01,,500\n2024-01-02,200,\n");
        let out = import_statement(&s, ImportPolicy::default());
        assert!(out.accepted[0].txn_type.is_income());
        assert!(out.accepted[1].txn_type.is_expense());
    }
}
