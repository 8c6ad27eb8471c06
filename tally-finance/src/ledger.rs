//! Combined transaction view: merge, sort and page.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tally_core::NormalizedTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Type,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Manual entries first, then statement rows, ordered newest date first.
/// Dates compare as strings, so only `YYYY-MM-DD` dates order correctly and
/// empty dates sink to the bottom.
pub fn combine(
    manual: Vec<NormalizedTransaction>,
    statement: Vec<NormalizedTransaction>,
) -> Vec<NormalizedTransaction> {
    let mut all = manual;
    all.extend(statement);
    all.sort_by(|a, b| b.date.cmp(&a.date));
    all
}

fn compare(a: &NormalizedTransaction, b: &NormalizedTransaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount.total_cmp(&b.amount),
        SortKey::Type => a
            .txn_type
            .as_str()
            .to_lowercase()
            .cmp(&b.txn_type.as_str().to_lowercase()),
        SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
    }
}

/// Stable sort; equal keys keep their relative order in either direction.
pub fn sort_transactions(txns: &mut [NormalizedTransaction], key: SortKey, dir: SortDirection) {
    txns.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match dir {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a> {
    pub items: &'a [NormalizedTransaction],
    /// Zero-based page actually shown
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

/// Slice out one page. Requests past the end show the last page; there is
/// always at least one (possibly empty) page.
pub fn paginate(txns: &[NormalizedTransaction], page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let total = txns.len();
    let pages = total.div_ceil(page_size).max(1);
    let page = page.min(pages - 1);
    let start = (page * page_size).min(total);
    let end = (start + page_size).min(total);

    Page {
        items: &txns[start..end],
        page,
        pages,
        total,
    }
}
