pub mod td_checking;
pub mod td_transaction;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ParseError;

/// Parse a statement money value such as "1,234.56", ignoring thousands separators.
pub fn parse_money(line: &str) -> Result<Decimal, ParseError> {
    Decimal::from_str(&line.trim().replace(',', "")).map_err(|_| ParseError::InvalidAmount {
        line: line.to_string(),
    })
}
