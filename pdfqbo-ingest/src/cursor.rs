//! LineCursor: front-to-back consumption of extracted statement lines.
//!
//! The scanner and its sub-parsers share one cursor by `&mut` borrow. A
//! sub-parser consumes as many lines as its record needs; the caller then
//! resumes at whatever line comes next. Lines are never revisited.

use crate::error::ParseError;

#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Consume the next line. `context` names what the caller was reading,
    /// for the error raised when nothing is left.
    pub fn pop(&mut self, context: &'static str) -> Result<&'a str, ParseError> {
        let Some(line) = self.lines.get(self.pos) else {
            return Err(ParseError::UnexpectedEnd {
                context,
                position: self.pos,
            });
        };
        self.pos += 1;
        Ok(line.as_str())
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }

    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pops_in_order_until_empty() {
        let v = lines(&["a", "b"]);
        let mut c = LineCursor::new(&v);
        assert_eq!(c.remaining(), 2);
        assert_eq!(c.pop("test").unwrap(), "a");
        assert_eq!(c.pop("test").unwrap(), "b");
        assert!(c.is_exhausted());
        assert_eq!(
            c.pop("amount"),
            Err(ParseError::UnexpectedEnd {
                context: "amount",
                position: 2
            })
        );
    }

    #[test]
    fn handoff_resumes_where_callee_stopped() {
        let v = lines(&["header", "value", "next"]);
        let mut c = LineCursor::new(&v);
        c.pop("header").unwrap();

        fn read_value<'a>(c: &mut LineCursor<'a>) -> &'a str {
            c.pop("value").unwrap()
        }
        assert_eq!(read_value(&mut c), "value");
        assert_eq!(c.remaining(), 1);
        assert_eq!(c.pop("next").unwrap(), "next");
    }
}
