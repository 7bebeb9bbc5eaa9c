// src/error.rs
use thiserror::Error;

/// Errors surfaced by the loading and analysis layers.
///
/// Cell-level problems (placeholders, garbage in numeric columns) never show
/// up here: the loader coerces them to zero.
#[derive(Debug, Error)]
pub enum PopError {
    #[error("missing required column '{column}' (accepted headers: {accepted})")]
    MissingColumn { column: &'static str, accepted: String },

    #[error("input is empty: no header row found")]
    EmptyInput,

    #[error("invalid year {value:?} on line {line}")]
    InvalidYear { line: u64, value: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no rows for the national aggregate region ({code})")]
    MissingNational { code: &'static str },

    #[error("forecast needs at least {needed} national records, found {found}")]
    InsufficientHistory { needed: usize, found: usize },

    #[error("{what} overflows a 64-bit integer")]
    Overflow { what: &'static str },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PopError>;
