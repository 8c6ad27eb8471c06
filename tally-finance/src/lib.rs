//! tally-finance: statement snapshots, import policy, manual entries,
//! ledger views and summaries built on normalized transactions

pub mod error;
pub mod import;
pub mod ledger;
pub mod manual;
pub mod statement;
pub mod summary;

pub use error::FinanceError;
pub use import::{ImportOutcome, ImportPolicy, SkipReason, SkippedRow, import_statement};
pub use ledger::{Page, SortDirection, SortKey, combine, paginate, sort_transactions};
pub use manual::ManualEntry;
pub use statement::{Statement, StatementLimits, latest};
pub use summary::{CategoryBudget, Summary, summarize, summarize_month};
