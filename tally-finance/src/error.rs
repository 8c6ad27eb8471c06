use tally_ingest::IngestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Invalid entry: {field} is required")]
    InvalidEntry { field: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
