//! tally-core: transaction types and parse-or-default helpers

pub mod amount;
pub mod transaction;

pub use amount::parse_amount;
pub use transaction::{DEFAULT_CATEGORY, NormalizedTransaction, TxnType};
