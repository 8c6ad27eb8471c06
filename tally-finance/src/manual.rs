use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{DEFAULT_CATEGORY, NormalizedTransaction, TxnType, parse_amount};

use crate::error::{FinanceError, Result};

/// A transaction typed in by the user rather than read from a statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub txn_type: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
}

fn blank(v: &Option<String>) -> bool {
    v.as_deref().is_none_or(|s| s.trim().is_empty())
}

impl ManualEntry {
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date.format("%Y-%m-%d").to_string());
        self
    }

    /// Date and amount are the two fields an entry cannot do without.
    pub fn validate(&self) -> Result<()> {
        if blank(&self.date) {
            return Err(FinanceError::InvalidEntry { field: "date".to_string() });
        }
        if blank(&self.amount) {
            return Err(FinanceError::InvalidEntry { field: "amount".to_string() });
        }
        Ok(())
    }

    /// Build the stored record. Missing fields take the same defaults as
    /// statement rows, with `Expense` when no type was given.
    pub fn into_transaction(self, id: impl Into<String>) -> NormalizedTransaction {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        NormalizedTransaction {
            id: id.into(),
            amount: parse_amount(self.amount.as_deref()),
            date: self.date.unwrap_or_default(),
            txn_type: non_empty(self.txn_type)
                .map(TxnType::from)
                .unwrap_or_default(),
            category: non_empty(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            description: self.description.unwrap_or_default(),
        }
    }
}
