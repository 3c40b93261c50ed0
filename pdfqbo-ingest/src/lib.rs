//! pdfqbo-ingest: statement text extraction and the TD Bank checking statement parser.

pub mod cursor;
pub mod error;
pub mod extract;
pub mod parsers;

pub use cursor::LineCursor;
pub use error::ParseError;
pub use extract::{load_statement_lines, split_lines};
pub use parsers::td_checking::{Section, parse_statement_period, scan_statement};
pub use parsers::td_transaction::{classify, reassemble};
