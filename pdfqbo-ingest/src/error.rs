use thiserror::Error;

/// Fatal statement parsing failures. The layout is assumed fixed, so none of
/// these are recoverable and no partial statement is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The lines ran out while a header or transaction still expected more.
    #[error("statement text ended while reading {context} (after line {position})")]
    UnexpectedEnd {
        context: &'static str,
        position: usize,
    },

    #[error("unable to determine transaction type for {hint:?}")]
    UnrecognizedType { hint: String },

    #[error("invalid statement period {line:?}")]
    InvalidPeriod { line: String },

    #[error("invalid amount {line:?}")]
    InvalidAmount { line: String },

    #[error("invalid transaction date {month:02}/{day:02}/{year}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Transaction rows only carry MM/DD; the year comes from the period header.
    #[error("transaction {line:?} appears before the statement period")]
    MissingPeriod { line: String },
}
