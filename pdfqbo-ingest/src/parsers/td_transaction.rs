//! Reassembly of one multi-line transaction record.
//!
//! After the `MM/DD` line a record looks like:
//!
//! ```text
//!   DEBIT CARD PURCHASE      <- type hint
//!   AMAZON.COM               <- zero or more description lines
//!   SEATTLE WA
//!   45.99                    <- amount
//! ```
//!
//! Inside "Checks Paid" the hint is only the check number.

use std::sync::OnceLock;

use chrono::NaiveDate;
use pdfqbo_core::{Transaction, TxnType};
use regex::Regex;
use tracing::debug;

use super::parse_money;
use super::td_checking::Section;
use crate::cursor::LineCursor;
use crate::error::ParseError;

/// Checked first, so a hint carrying both kinds of keyword is a credit.
const CREDIT_KEYWORDS: &[&str] = &["DEPOSIT", "CREDIT", "REFUND"];

const DEBIT_KEYWORDS: &[&str] = &[
    "ELECTRONIC PMT",
    "PAY",
    "WITHDRAW",
    "DEBIT",
    "FEE",
    "CHARGE",
    "PMT",
    "OVERDRAFT PD",
];

/// Paper checks listed among other activity; they are repeated under "Checks Paid".
const CHECK_MARKER: &str = "Check #";

/// Plain amount with at most one thousands group (no amounts of 1,000,000 or more).
fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(,\d{3})?\.\d{2}$").expect("amount regex"))
}

pub fn is_amount_line(line: &str) -> bool {
    amount_re().is_match(line)
}

/// Keyword heuristic over the type hint line, case-insensitive.
pub fn classify(hint: &str) -> Option<TxnType> {
    let upper = hint.to_uppercase();
    if CREDIT_KEYWORDS.iter().any(|k| upper.contains(k)) {
        return Some(TxnType::Credit);
    }
    if DEBIT_KEYWORDS.iter().any(|k| upper.contains(k)) {
        return Some(TxnType::Debit);
    }
    None
}

/// Consume the lines of one transaction whose date line was just popped.
///
/// Returns `Ok(None)` for a paper check seen outside "Checks Paid": its lines
/// are consumed and the check is picked up again from that section.
pub fn reassemble(
    cursor: &mut LineCursor<'_>,
    date: NaiveDate,
    section: Section,
) -> Result<Option<Transaction>, ParseError> {
    let hint = cursor.pop("transaction type")?;
    let in_checks = section == Section::Checks;

    let txn_type = if in_checks {
        TxnType::Debit
    } else {
        match classify(hint) {
            Some(t) => t,
            None if hint.starts_with(CHECK_MARKER) => {
                let amount = cursor.pop("deferred check amount")?;
                let trailer = cursor.pop("deferred check")?;
                debug!(%date, hint, amount, trailer, "deferring paper check");
                return Ok(None);
            }
            None => {
                return Err(ParseError::UnrecognizedType {
                    hint: hint.to_string(),
                });
            }
        }
    };

    let mut description = if in_checks {
        format!("{CHECK_MARKER} {hint}")
    } else {
        hint.to_string()
    };

    let amount_line = loop {
        let line = cursor.pop("transaction amount")?;
        if is_amount_line(line) {
            break line;
        }
        description.push(' ');
        description.push_str(line);
    };

    let magnitude = parse_money(amount_line)?;
    Ok(Some(Transaction::new(date, txn_type, magnitude, description)))
}
