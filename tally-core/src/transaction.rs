//! Transaction record types shared by the ingest and finance crates

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category used when a source row carries none.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Direction of a transaction.
///
/// Inference only ever produces `Income` or `Expense`; an explicit value from
/// a statement column that is neither is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxnType {
    Income,
    #[default]
    Expense,
    Other(String),
}

impl TxnType {
    /// Map a raw label to a type. Only the exact labels `Income` and
    /// `Expense` are recognized; anything else is carried as-is.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Income" => TxnType::Income,
            "Expense" => TxnType::Expense,
            other => TxnType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TxnType::Income => "Income",
            TxnType::Expense => "Expense",
            TxnType::Other(s) => s.as_str(),
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, TxnType::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, TxnType::Expense)
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TxnType {
    fn from(s: String) -> Self {
        TxnType::from_label(&s)
    }
}

impl From<TxnType> for String {
    fn from(t: TxnType) -> Self {
        t.as_str().to_string()
    }
}

/// Canonical transaction produced from a statement row or a manual entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedTransaction {
    /// Unique within a batch: `{batch_id}_{row_index}` for statement rows
    pub id: String,
    /// Ideally `YYYY-MM-DD`; empty when the source had no usable date
    pub date: String,
    #[serde(rename = "type")]
    pub txn_type: TxnType,
    pub category: String,
    /// Zero when the source value could not be parsed
    pub amount: f64,
    pub description: String,
}

impl NormalizedTransaction {
    /// Parse `date` as `YYYY-MM-DD`, if it is one.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// True when `date` falls in the given calendar month.
    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.parsed_date()
            .map(|d| d.year() == year && d.month() == month)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(date: &str, amount: f64) -> NormalizedTransaction {
        NormalizedTransaction {
            id: "b_0".to_string(),
            date: date.to_string(),
            txn_type: TxnType::Expense,
            category: DEFAULT_CATEGORY.to_string(),
            amount,
            description: String::new(),
        }
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(TxnType::from_label("Income"), TxnType::Income);
        assert_eq!(TxnType::from_label("Expense"), TxnType::Expense);
        assert_eq!(TxnType::from_label("income"), TxnType::Other("income".to_string()));
        assert_eq!(TxnType::Other("Transfer".to_string()).to_string(), "Transfer");
    }

    #[test]
    fn test_serializes_type_as_plain_string() {
        let t = txn("2024-01-05", 1200.0);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "Expense");
        assert_eq!(json["amount"], 1200.0);

        let back: NormalizedTransaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_parsed_date_and_month() {
        let t = txn("2024-03-09", 10.0);
        assert_eq!(t.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 9));
        assert!(t.in_month(2024, 3));
        assert!(!t.in_month(2024, 4));

        assert_eq!(txn("09/03/2024", 10.0).parsed_date(), None);
        assert!(!txn("", 10.0).in_month(2024, 3));
    }
}
