use thiserror::Error;

/// Errors reported by pointer ledger implementations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown ledger transaction: {0}")]
    UnknownTx(String),

    #[error("ledger transaction {tx_id} not final after {polls} polls")]
    FinalityTimeout { tx_id: String, polls: u32 },

    #[error("ledger gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid ledger base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("ledger url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
