use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use pdfqbo_core::{Config, StatementDocument, TxnType};
use pdfqbo_ingest::{load_statement_lines, scan_statement};
use pdfqbo_ofx::render_ofx;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join("td_checking_statement.txt")
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn fixture_document() -> StatementDocument {
    let lines = load_statement_lines(fixture_path()).unwrap();
    let draft = scan_statement(&lines).unwrap();
    StatementDocument::assemble(draft, &Config::default().institution).unwrap()
}

/// Real-layout regression: every activity section of the fixture is picked up once.
#[test]
fn test_fixture_transactions() {
    let doc = fixture_document();
    let txns = doc.transactions();
    assert_eq!(txns.len(), 7, "got {txns:#?}");

    assert_eq!(doc.account_number(), "432-1234567");
    assert_eq!(doc.balances().starting, dec("1234.56"));
    assert_eq!(doc.balances().ending, dec("2444.27"));

    // Activity nets out to the balance change.
    let net: Decimal = txns.iter().map(|t| t.amount).sum();
    assert_eq!(net, doc.balances().ending - doc.balances().starting);

    // Check 103 shows up once, from the Checks Paid section.
    let checks: Vec<_> = txns.iter().filter(|t| t.description.starts_with("Check # ")).collect();
    assert_eq!(checks.len(), 2);
    assert!(checks.iter().all(|t| t.txn_type == TxnType::Debit));
    assert!(checks.iter().any(|t| t.description == "Check # 103" && t.amount == dec("-120.00")));

    for t in txns {
        assert!(t.description.chars().count() <= 32);
        assert_eq!(t.txn_type == TxnType::Debit, t.amount <= Decimal::ZERO);
    }
}

/// December statement: January rows land in the next year.
#[test]
fn test_fixture_year_rollover() {
    let doc = fixture_document();
    let amazon = doc
        .transactions()
        .iter()
        .find(|t| t.description.starts_with("DEBIT CARD PURCHASE"))
        .unwrap();
    assert_eq!(amazon.date, NaiveDate::from_ymd_opt(2021, 1, 8).unwrap());
    assert_eq!(amazon.amount, dec("-1045.30"));

    let mut december = doc.transactions().iter().filter(|t| t.date.month() == 12);
    assert!(december.all(|t| t.date.year() == 2020));
}

#[test]
fn test_fixture_renders_ofx() {
    let cfg = Config::default();
    let doc = fixture_document();
    let now = Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap();
    let out = render_ofx(&doc, &cfg.statement, now).unwrap();

    assert_eq!(out.matches("<STMTTRN>").count(), 7);
    assert!(out.contains("<ACCTID>432-1234567</ACCTID>"));
    assert!(out.contains("<DTSTART>20201215000000.000[0:GMT]</DTSTART>"));
    assert!(out.contains("<DTEND>20210114000000.000[0:GMT]</DTEND>"));
    assert!(out.contains("<BALAMT>2444.27</BALAMT>"));
    assert!(out.contains("<TRNAMT>2500.00</TRNAMT>"));
    assert!(out.contains("<FITID>20201218000002500002</FITID>"));
    assert!(out.contains("<NAME>Check # 102</NAME>"));
}
