//! Statement text extraction.
//!
//! PDF statements go through `pdf-extract`; a statement that was already
//! converted to text (one fragment per line) can be read directly.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Split extracted text into trimmed, non-blank lines in reading order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract the text of every page of a PDF statement, pages in document order.
pub fn extract_pdf_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = pdf_extract::extract_text(path)
        .map_err(|e| anyhow::anyhow!("extracting text from {}: {e}", path.display()))?;
    let lines = split_lines(&text);
    debug!(path = %path.display(), lines = lines.len(), "extracted pdf text");
    Ok(lines)
}

pub fn read_text_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(split_lines(&text))
}

/// Load statement lines, treating `.txt` files as pre-extracted text and
/// everything else as PDF.
pub fn load_statement_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    if is_text {
        read_text_lines(path)
    } else {
        extract_pdf_lines(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("fixtures")
            .join("td_checking_statement.txt")
    }

    #[test]
    fn test_split_lines_drops_blanks() {
        let text = "Statement Period:\n\n  Jan 01 2021-Jan 31 2021  \n   \n01/05\n";
        assert_eq!(
            split_lines(text),
            vec!["Statement Period:", "Jan 01 2021-Jan 31 2021", "01/05"]
        );
    }

    #[test]
    fn test_load_text_fixture() {
        let lines = load_statement_lines(fixture_path()).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("Statement Period:")));
        assert!(lines.iter().all(|l| !l.trim().is_empty()));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_text_lines("/nonexistent/statement.txt").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/statement.txt"));
    }
}
