//! Statement row normalization.
//!
//! Maps a loosely named statement row onto a `NormalizedTransaction`:
//!   - headers are matched after trimming and lower-casing, by exact equality
//!   - each logical field has an ordered list of accepted header names
//!   - a name whose cell is empty falls through to the next name
//!   - every field has a default, so normalization never fails
//!
//! Rows with an empty date or a zero amount still come out of here; dropping
//! them is the importer's call.

use tally_core::{DEFAULT_CATEGORY, NormalizedTransaction, TxnType, parse_amount};

use crate::types::RawRow;

const DATE: &[&str] = &["date", "txn_date", "transaction_date"];
const TYPE: &[&str] = &["type", "txn_type"];
const CATEGORY: &[&str] = &["category"];
const DEBIT: &[&str] = &["debit"];
const CREDIT: &[&str] = &["credit"];
const AMOUNT: &[&str] = &["amount"];
const DESCRIPTION: &[&str] = &["description", "narration"];

/// First non-empty cell among `names`, tried in priority order.
fn resolve<'a>(row: &'a RawRow, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| row.lookup(name))
        .find(|v| !v.is_empty())
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Credit-only rows are income, debit-only rows are expenses. When both or
/// neither are filled there is no signal and the row is an expense.
fn infer_type(debit: Option<&str>, credit: Option<&str>) -> TxnType {
    match (is_filled(debit), is_filled(credit)) {
        (false, true) => TxnType::Income,
        (true, false) => TxnType::Expense,
        _ => TxnType::Expense,
    }
}

/// Normalize one statement row. `row_index` is the row's position in its
/// batch and, with `batch_id`, forms the transaction id.
pub fn normalize_row(row: &RawRow, row_index: usize, batch_id: &str) -> NormalizedTransaction {
    let debit = resolve(row, DEBIT);
    let credit = resolve(row, CREDIT);

    let amount_raw = resolve(row, AMOUNT).or(debit).or(credit);

    let txn_type = match resolve(row, TYPE) {
        Some(explicit) => TxnType::from_label(explicit),
        None => infer_type(debit, credit),
    };

    NormalizedTransaction {
        id: format!("{batch_id}_{row_index}"),
        date: resolve(row, DATE).unwrap_or_default().to_string(),
        txn_type,
        category: resolve(row, CATEGORY).unwrap_or(DEFAULT_CATEGORY).to_string(),
        amount: parse_amount(amount_raw),
        description: resolve(row, DESCRIPTION).unwrap_or_default().to_string(),
    }
}

/// Normalize rows lazily, one transaction per row, in input order.
pub fn normalize_batch<'a, I>(
    rows: I,
    batch_id: &'a str,
) -> impl Iterator<Item = NormalizedTransaction> + 'a
where
    I: IntoIterator<Item = &'a RawRow>,
    I::IntoIter: 'a,
{
    rows.into_iter()
        .enumerate()
        .map(move |(i, row)| normalize_row(row, i, batch_id))
}
