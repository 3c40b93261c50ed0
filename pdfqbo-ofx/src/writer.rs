//! Render a [`StatementDocument`] as an OFX 2.2 (XML) bank statement response.
//!
//! Layout:
//!   OFX
//!     SIGNONMSGSRSV1/SONRS   STATUS, DTSERVER, LANGUAGE, FI
//!     BANKMSGSRSV1/STMTTRNRS TRNUID, STATUS, STMTRS
//!       STMTRS               CURDEF, BANKACCTFROM, BANKTRANLIST, LEDGERBAL

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use pdfqbo_core::time::{ofx_datetime, ofx_timestamp_utc, parse_timezone};
use pdfqbo_core::{StatementConfig, StatementDocument, Transaction};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

pub const OFX_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#,
    "\n",
    r#"<?OFX OFXHEADER="200" VERSION="220" SECURITY="NONE" OLDFILEUID="NONE" NEWFILEUID="NONE"?>"#,
);

const STATUS_OK_CODE: &str = "0";
const STATUS_INFO: &str = "INFO";

/// Thin wrapper over the quick-xml writer for OFX aggregates and leaf elements.
struct OfxWriter {
    inner: Writer<Vec<u8>>,
}

impl OfxWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 3),
        }
    }

    fn open(&mut self, tag: &str) -> Result<()> {
        self.inner
            .write_event(Event::Start(BytesStart::new(tag)))
            .with_context(|| format!("writing <{tag}>"))?;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(tag)))
            .with_context(|| format!("writing </{tag}>"))?;
        Ok(())
    }

    fn leaf(&mut self, tag: &str, value: &str) -> Result<()> {
        self.open(tag)?;
        self.inner
            .write_event(Event::Text(BytesText::new(value)))
            .with_context(|| format!("writing {tag} value"))?;
        self.close(tag)
    }

    fn status(&mut self) -> Result<()> {
        self.open("STATUS")?;
        self.leaf("CODE", STATUS_OK_CODE)?;
        self.leaf("SEVERITY", STATUS_INFO)?;
        self.close("STATUS")
    }

    fn transaction(&mut self, txn: &Transaction, tz: Tz) -> Result<()> {
        self.open("STMTTRN")?;
        self.leaf("TRNTYPE", txn.txn_type.ofx_name())?;
        self.leaf("DTPOSTED", &ofx_datetime(txn.date, tz)?)?;
        self.leaf("TRNAMT", &txn.amount.to_string())?;
        self.leaf("FITID", &txn.fitid)?;
        self.leaf("NAME", &txn.description)?;
        self.close("STMTTRN")
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).context("OFX body is not valid UTF-8")
    }
}

/// Render the full document, header included.
///
/// `server_time` becomes `<DTSERVER>`; callers pass the current time.
pub fn render_ofx(
    doc: &StatementDocument,
    statement: &StatementConfig,
    server_time: DateTime<Utc>,
) -> Result<String> {
    let tz = parse_timezone(&statement.timezone)?;
    let period = doc.period();
    let institution = doc.institution();
    let mut w = OfxWriter::new();

    w.open("OFX")?;

    w.open("SIGNONMSGSRSV1")?;
    w.open("SONRS")?;
    w.status()?;
    w.leaf("DTSERVER", &ofx_timestamp_utc(server_time))?;
    w.leaf("LANGUAGE", &statement.language)?;
    w.open("FI")?;
    w.leaf("ORG", &institution.org)?;
    w.leaf("FID", &institution.fid)?;
    w.close("FI")?;
    w.close("SONRS")?;
    w.close("SIGNONMSGSRSV1")?;

    w.open("BANKMSGSRSV1")?;
    w.open("STMTTRNRS")?;
    w.leaf("TRNUID", "0")?;
    w.status()?;
    w.open("STMTRS")?;
    w.leaf("CURDEF", &statement.currency)?;

    w.open("BANKACCTFROM")?;
    w.leaf("BANKID", &institution.bank_id)?;
    w.leaf("ACCTID", doc.account_number())?;
    w.leaf("ACCTTYPE", &statement.account_type)?;
    w.close("BANKACCTFROM")?;

    w.open("BANKTRANLIST")?;
    w.leaf("DTSTART", &ofx_datetime(period.start(), tz)?)?;
    w.leaf("DTEND", &ofx_datetime(period.end(), tz)?)?;
    for txn in doc.transactions() {
        w.transaction(txn, tz)?;
    }
    w.close("BANKTRANLIST")?;

    w.open("LEDGERBAL")?;
    w.leaf("BALAMT", &doc.balances().ending.to_string())?;
    w.leaf("DTASOF", &ofx_datetime(period.end(), tz)?)?;
    w.close("LEDGERBAL")?;

    w.close("STMTRS")?;
    w.close("STMTTRNRS")?;
    w.close("BANKMSGSRSV1")?;

    w.close("OFX")?;

    let body = w.finish()?;
    Ok(format!("{OFX_HEADER}\n{body}\n"))
}

/// `statements/td-2021-01.pdf` -> `td-2021-01.qbo`
pub fn output_file_name(input: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .with_context(|| format!("{} has no file name", input.display()))?;
    Ok(Path::new(name).with_extension("qbo"))
}
