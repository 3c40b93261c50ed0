//! Statement model: period, balances, transactions and the assembled document.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::InstitutionConfig;

/// Maximum length (in characters) of a transaction name in the output document.
pub const MAX_DESCRIPTION_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxnType {
    #[serde(rename = "CREDIT")]
    Credit,
    #[serde(rename = "DEBIT")]
    Debit,
}

impl TxnType {
    pub fn ofx_name(&self) -> &'static str {
        match self {
            TxnType::Credit => "CREDIT",
            TxnType::Debit => "DEBIT",
        }
    }
}

/// Calendar range covered by a statement. `end` never precedes `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl StatementPeriod {
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if end < start {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// A December statement may carry January transactions of the following year.
    pub fn spans_year_end(&self) -> bool {
        self.start.month() == 12
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub starting: Decimal,
    pub ending: Decimal,
}

/// One posted line of the statement.
///
/// Debits are stored with a non-positive amount, credits with a positive one.
/// A zero amount is always a debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub txn_type: TxnType,
    pub amount: Decimal,
    pub description: String,
    /// Derived from date, amount and type. Not guaranteed unique: two
    /// same-day transactions of the same type and amount share an id.
    pub fitid: String,
}

impl Transaction {
    /// Build a transaction from the unsigned amount printed on the statement.
    ///
    /// A zero magnitude is recorded as a debit whatever `txn_type` says.
    pub fn new(
        date: NaiveDate,
        txn_type: TxnType,
        magnitude: Decimal,
        description: impl AsRef<str>,
    ) -> Self {
        let magnitude = magnitude.abs();
        let (txn_type, amount) = match txn_type {
            _ if magnitude.is_zero() => (TxnType::Debit, magnitude),
            TxnType::Debit => (TxnType::Debit, -magnitude),
            TxnType::Credit => (TxnType::Credit, magnitude),
        };
        let description: String = description
            .as_ref()
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();

        Self {
            date,
            txn_type,
            amount,
            description,
            fitid: synthesize_fitid(date, amount),
        }
    }
}

/// `YYYYMMDD` + `00000` + absolute cents + `2` for money in, `1` otherwise.
///
/// e.g. a -3563.44 debit on 2021-07-19 gives `20210719000003563441`.
pub fn synthesize_fitid(date: NaiveDate, amount: Decimal) -> String {
    let cents = (amount.abs() * Decimal::ONE_HUNDRED)
        .trunc()
        .to_u64()
        .unwrap_or(0);
    let discriminant = if amount > Decimal::ZERO { 2 } else { 1 };
    format!(
        "{:04}{:02}{:02}{:05}{}{}",
        date.year(),
        date.month(),
        date.day(),
        0,
        cents,
        discriminant
    )
}

/// Fields accumulated by the statement scanner. Anything the statement never
/// announced stays `None` until [`StatementDocument::assemble`] checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementDraft {
    pub period: Option<StatementPeriod>,
    pub account_number: Option<String>,
    pub starting_balance: Option<Decimal>,
    pub ending_balance: Option<Decimal>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceKind {
    Starting,
    Ending,
}

impl std::fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceKind::Starting => f.write_str("starting"),
            BalanceKind::Ending => f.write_str("ending"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("statement has no {0} balance")]
    MissingBalance(BalanceKind),
    #[error("statement period was never found")]
    MissingPeriod,
    #[error("primary account number was never found")]
    MissingAccountNumber,
}

/// A fully parsed checking statement, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementDocument {
    institution: InstitutionConfig,
    account_number: String,
    period: StatementPeriod,
    balances: Balances,
    transactions: Vec<Transaction>,
}

impl StatementDocument {
    pub fn assemble(
        draft: StatementDraft,
        institution: &InstitutionConfig,
    ) -> Result<Self, DocumentError> {
        let starting = draft
            .starting_balance
            .ok_or(DocumentError::MissingBalance(BalanceKind::Starting))?;
        let ending = draft
            .ending_balance
            .ok_or(DocumentError::MissingBalance(BalanceKind::Ending))?;
        let period = draft.period.ok_or(DocumentError::MissingPeriod)?;
        let account_number = draft
            .account_number
            .ok_or(DocumentError::MissingAccountNumber)?;

        Ok(Self {
            institution: institution.clone(),
            account_number,
            period,
            balances: Balances { starting, ending },
            transactions: draft.transactions,
        })
    }

    pub fn institution(&self) -> &InstitutionConfig {
        &self.institution
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn period(&self) -> StatementPeriod {
        self.period
    }

    pub fn balances(&self) -> Balances {
        self.balances
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}
