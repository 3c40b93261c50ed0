//! TD Bank checking statement scanner (PDF text, one fragment per line)
//!
//! The extracted text is a flat list of fragments in reading order. Headers
//! are recognized by prefix and switch the scanner between sections:
//!
//!   Statement Period:            -> next line "Jan 01 2021-Jan 31 2021"
//!   Primary Account #:           -> next line is the account number
//!   Statement Balance as of ...  -> next line; first is starting, second ending
//!   Beginning Balance / Ending Balance
//!   Checks Paid                  -> following transactions are paper checks
//!   Electronic Payments          -> back to keyword classification
//!   DAILY BALANCE SUMMARY / INTEREST SUMMARY -> stop
//!
//! Any line starting with `MM/DD` opens a transaction record.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use pdfqbo_core::{StatementDraft, StatementPeriod};
use regex::Regex;
use tracing::{debug, info, warn};

use super::parse_money;
use super::td_transaction::reassemble;
use crate::cursor::LineCursor;
use crate::error::ParseError;

/// Where the scanner is within the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Before any activity section; transactions use keyword classification.
    Seeking,
    /// "Checks Paid": every transaction is a paper check debit.
    Checks,
    Electronic,
    /// Past the last transaction section. Remaining lines are ignored.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    ChecksPaid,
    ElectronicPayments,
    StatementPeriod,
    AccountNumber,
    StatementBalance,
    BeginningBalance,
    EndingBalance,
    Summary,
}

/// Tested in order; the first matching prefix wins.
const HEADERS: &[(&str, Header)] = &[
    ("Checks Paid", Header::ChecksPaid),
    ("Electronic Payments", Header::ElectronicPayments),
    ("Statement Period:", Header::StatementPeriod),
    ("Primary Account #:", Header::AccountNumber),
    ("Statement Balance as of", Header::StatementBalance),
    ("Beginning Balance", Header::BeginningBalance),
    ("Ending Balance", Header::EndingBalance),
    ("DAILY BALANCE SUMMARY", Header::Summary),
    ("INTEREST SUMMARY", Header::Summary),
];

fn classify_header(line: &str) -> Option<Header> {
    HEADERS
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|(_, header)| *header)
}

fn txn_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})").expect("transaction date regex"))
}

/// Parse the line after "Statement Period:", e.g. "Jan 01 2021-Jan 31 2021".
pub fn parse_statement_period(line: &str) -> Result<StatementPeriod, ParseError> {
    let invalid = || ParseError::InvalidPeriod {
        line: line.to_string(),
    };

    let (start, end) = line.split_once('-').ok_or_else(invalid)?;
    let start = NaiveDate::parse_from_str(start.trim(), "%b %d %Y").map_err(|_| invalid())?;
    let end = NaiveDate::parse_from_str(end.trim(), "%b %d %Y").map_err(|_| invalid())?;

    StatementPeriod::new(start, end).ok_or_else(invalid)
}

struct Scanner {
    section: Section,
    draft: StatementDraft,
    /// Year applied to `MM/DD` transaction dates.
    year: i32,
    /// A December statement moves to the next year on its first January row, once.
    rolled_over: bool,
}

impl Scanner {
    fn new() -> Self {
        Self {
            section: Section::Seeking,
            draft: StatementDraft::default(),
            year: 0,
            rolled_over: false,
        }
    }

    fn step<'a>(&mut self, line: &'a str, cursor: &mut LineCursor<'a>) -> Result<(), ParseError> {
        match classify_header(line) {
            Some(Header::ChecksPaid) => {
                info!("processing Checks Paid section");
                self.section = Section::Checks;
            }
            Some(Header::ElectronicPayments) => {
                debug!("entering Electronic Payments section");
                self.section = Section::Electronic;
            }
            Some(Header::StatementPeriod) => {
                let period = parse_statement_period(cursor.pop("statement period")?)?;
                info!(start = %period.start(), end = %period.end(), "statement period");
                self.year = period.start().year();
                self.draft.period = Some(period);
            }
            Some(Header::AccountNumber) => {
                let account = cursor.pop("account number")?;
                self.draft.account_number = Some(account.to_string());
            }
            Some(Header::StatementBalance) => {
                let balance = parse_money(cursor.pop("statement balance")?)?;
                if self.draft.starting_balance.is_none() {
                    self.draft.starting_balance = Some(balance);
                } else {
                    if let Some(previous) = self.draft.ending_balance {
                        warn!(%previous, %balance, "more than two statement balances, keeping the last");
                    }
                    self.draft.ending_balance = Some(balance);
                }
            }
            Some(Header::BeginningBalance) => {
                let balance = parse_money(cursor.pop("beginning balance")?)?;
                self.draft.starting_balance = Some(balance);
            }
            Some(Header::EndingBalance) => {
                let balance = parse_money(cursor.pop("ending balance")?)?;
                self.draft.ending_balance = Some(balance);
            }
            Some(Header::Summary) => {
                debug!(line, "end of transaction sections");
                self.section = Section::Terminal;
            }
            None => self.transaction_start(line, cursor)?,
        }
        Ok(())
    }

    fn transaction_start<'a>(
        &mut self,
        line: &'a str,
        cursor: &mut LineCursor<'a>,
    ) -> Result<(), ParseError> {
        let Some(caps) = txn_start_re().captures(line) else {
            return Ok(());
        };
        // Both groups are two ASCII digits.
        let month: u32 = caps[1].parse().unwrap_or(0);
        let day: u32 = caps[2].parse().unwrap_or(0);

        let date = self.resolve_date(line, month, day)?;
        debug!(%date, line, "transaction");

        match reassemble(cursor, date, self.section)? {
            Some(txn) => {
                debug!(
                    txn_type = txn.txn_type.ofx_name(),
                    amount = %txn.amount,
                    description = %txn.description,
                    fitid = %txn.fitid,
                    "adding transaction"
                );
                self.draft.transactions.push(txn);
            }
            None => {
                info!(%date, "deferred paper check until the Checks Paid section");
            }
        }
        Ok(())
    }

    fn resolve_date(&mut self, line: &str, month: u32, day: u32) -> Result<NaiveDate, ParseError> {
        let Some(period) = self.draft.period else {
            return Err(ParseError::MissingPeriod {
                line: line.to_string(),
            });
        };

        if period.spans_year_end() && month == 1 && !self.rolled_over {
            self.year += 1;
            self.rolled_over = true;
        }

        NaiveDate::from_ymd_opt(self.year, month, day).ok_or(ParseError::InvalidDate {
            year: self.year,
            month,
            day,
        })
    }
}

/// Scan a TD Bank checking statement's extracted lines.
///
/// Stops at the end of the lines or at the first summary header, whichever
/// comes first. Missing balances are not checked here; see
/// [`pdfqbo_core::StatementDocument::assemble`].
pub fn scan_statement(lines: &[String]) -> Result<StatementDraft, ParseError> {
    let mut cursor = LineCursor::new(lines);
    let mut scanner = Scanner::new();

    while scanner.section != Section::Terminal && !cursor.is_exhausted() {
        let line = cursor.pop("statement")?;
        scanner.step(line, &mut cursor)?;
    }

    info!(
        transactions = scanner.draft.transactions.len(),
        starting_balance = ?scanner.draft.starting_balance,
        ending_balance = ?scanner.draft.ending_balance,
        ignored_lines = cursor.remaining(),
        "statement scanned"
    );
    Ok(scanner.draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfqbo_core::TxnType;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn with_period(period: &str, rest: &[&str]) -> Vec<String> {
        let mut v = vec!["Statement Period:", period];
        v.extend_from_slice(rest);
        lines(&v)
    }

    #[test]
    fn test_statement_period() {
        let p = parse_statement_period("Jan 01 2021-Jan 31 2021").unwrap();
        assert_eq!(p.start(), NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(p.end(), NaiveDate::from_ymd_opt(2021, 1, 31).unwrap());

        let p = parse_statement_period("Dec 15 2020 - Jan 14 2021").unwrap();
        assert_eq!(p.end().year(), 2021);

        assert!(parse_statement_period("Jan 01 2021").is_err());
        assert!(parse_statement_period("Feb 01 2021-Jan 01 2021").is_err());
    }

    #[test]
    fn test_statement_balance_style() {
        let v = lines(&[
            "Statement Balance as of 01/01/2021",
            "1,234.56",
            "Some other content",
            "Statement Balance as of 01/31/2021",
            "2,345.67",
        ]);
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.starting_balance, Some(dec("1234.56")));
        assert_eq!(draft.ending_balance, Some(dec("2345.67")));
    }

    #[test]
    fn test_third_statement_balance_overrides_ending() {
        let v = lines(&[
            "Statement Balance as of",
            "1.00",
            "Statement Balance as of",
            "2.00",
            "Statement Balance as of",
            "3.00",
        ]);
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.starting_balance, Some(dec("1.00")));
        assert_eq!(draft.ending_balance, Some(dec("3.00")));
    }

    #[test]
    fn test_beginning_ending_balance_style_any_order() {
        let v = lines(&["Ending Balance", "750.25", "Beginning Balance", "500.00"]);
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.starting_balance, Some(dec("500.00")));
        assert_eq!(draft.ending_balance, Some(dec("750.25")));
    }

    #[test]
    fn test_account_number_taken_verbatim() {
        let v = lines(&["Primary Account #:", "432-1234567"]);
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.account_number.as_deref(), Some("432-1234567"));
    }

    #[test]
    fn test_deferred_check_then_checks_paid() {
        let v = with_period(
            "Jan 01 2021-Jan 31 2021",
            &[
                "01/05",
                "Check # 103",
                "some bank note",
                "120.00",
                "Checks Paid",
                "01/05",
                "103",
                "120.00",
            ],
        );
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.transactions.len(), 1);
        let t = &draft.transactions[0];
        assert_eq!(t.txn_type, TxnType::Debit);
        assert_eq!(t.amount, dec("-120.00"));
        assert_eq!(t.description, "Check # 103");
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2021, 1, 5).unwrap());
    }

    #[test]
    fn test_electronic_payments_ends_checks_section() {
        let v = with_period(
            "Mar 01 2021-Mar 31 2021",
            &[
                "Checks Paid",
                "03/02",
                "101",
                "50.00",
                "Electronic Deposits",
                "Electronic Payments",
                "03/03",
                "CCD DEPOSIT PAYROLL",
                "900.00",
            ],
        );
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.transactions.len(), 2);
        assert_eq!(draft.transactions[0].description, "Check # 101");
        assert_eq!(draft.transactions[1].txn_type, TxnType::Credit);
        assert_eq!(draft.transactions[1].amount, dec("900.00"));
    }

    #[test]
    fn test_multiline_description_transaction() {
        let v = with_period(
            "Mar 01 2021-Mar 31 2021",
            &["03/14", "DEBIT CARD PURCHASE", "AMAZON.COM", "SEATTLE WA", "45.99"],
        );
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.transactions.len(), 1);
        let t = &draft.transactions[0];
        assert_eq!(t.amount, dec("-45.99"));
        assert_eq!(t.description, "DEBIT CARD PURCHASE AMAZON.COM S");
    }

    #[test]
    fn test_unrecognized_hint_aborts() {
        let v = with_period(
            "May 01 2021-May 31 2021",
            &["05/01", "MYSTERY ENTRY", "10.00", "05/02", "DEPOSIT", "5.00"],
        );
        let err = scan_statement(&v).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedType { .. }));
    }

    #[test]
    fn test_december_statement_rolls_year_once() {
        let v = with_period(
            "Dec 15 2020-Jan 14 2021",
            &[
                "12/20", "DEPOSIT", "10.00", //
                "01/02", "DEPOSIT", "20.00", //
                "01/09", "DEPOSIT", "30.00",
            ],
        );
        let draft = scan_statement(&v).unwrap();
        let years: Vec<i32> = draft.transactions.iter().map(|t| t.date.year()).collect();
        assert_eq!(years, vec![2020, 2021, 2021]);
    }

    #[test]
    fn test_non_december_statement_never_rolls() {
        let v = with_period(
            "Jan 01 2021-Jan 31 2021",
            &["01/02", "DEPOSIT", "20.00", "01/30", "FEE", "1.00"],
        );
        let draft = scan_statement(&v).unwrap();
        assert!(draft.transactions.iter().all(|t| t.date.year() == 2021));
    }

    #[test]
    fn test_summary_header_stops_scanning() {
        let v = with_period(
            "Jan 01 2021-Jan 31 2021",
            &[
                "01/02",
                "DEPOSIT",
                "20.00",
                "DAILY BALANCE SUMMARY",
                "01/03",
                "MYSTERY ENTRY",
                "1.00",
            ],
        );
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.transactions.len(), 1);
    }

    #[test]
    fn test_interest_summary_stops_scanning() {
        let v = with_period(
            "Jan 01 2021-Jan 31 2021",
            &["INTEREST SUMMARY", "01/03", "MYSTERY", "1.00"],
        );
        let draft = scan_statement(&v).unwrap();
        assert!(draft.transactions.is_empty());
        assert!(draft.period.is_some());
    }

    #[test]
    fn test_transaction_before_period_is_error() {
        let v = lines(&["01/02", "DEPOSIT", "20.00"]);
        assert!(matches!(
            scan_statement(&v),
            Err(ParseError::MissingPeriod { .. })
        ));
    }

    #[test]
    fn test_header_missing_value_is_error() {
        let v = lines(&["Primary Account #:"]);
        assert!(matches!(
            scan_statement(&v),
            Err(ParseError::UnexpectedEnd {
                context: "account number",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_calendar_date() {
        let v = with_period("Feb 01 2021-Feb 28 2021", &["02/30", "DEPOSIT", "1.00"]);
        assert_eq!(
            scan_statement(&v),
            Err(ParseError::InvalidDate {
                year: 2021,
                month: 2,
                day: 30
            })
        );
    }

    #[test]
    fn test_sign_agrees_with_type() {
        let v = with_period(
            "Jan 01 2021-Jan 31 2021",
            &[
                "01/02", "DEPOSIT", "20.00", //
                "01/03", "ATM WITHDRAWAL", "40.00", //
                "01/04", "MONTHLY MAINTENANCE FEE", "0.00", //
                "01/05", "DEPOSIT", "0.00",
            ],
        );
        let draft = scan_statement(&v).unwrap();
        assert_eq!(draft.transactions.len(), 4);
        assert_eq!(draft.transactions[3].txn_type, TxnType::Debit);
        assert_eq!(draft.transactions[3].fitid, "202101050000001");
        for t in &draft.transactions {
            match t.txn_type {
                TxnType::Debit => assert!(t.amount <= Decimal::ZERO),
                TxnType::Credit => assert!(t.amount > Decimal::ZERO),
            }
        }
    }
}
