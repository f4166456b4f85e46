//! Header-anchored scanning over logical lines.
//!
//! Both legacy formats are searched the same way: walk the file line by line
//! until a header line satisfies a predicate, then hand the lines that follow
//! to the caller. Only the first accepted header counts, so a predicate that
//! matches by substring picks whichever block appears first in the file.

use std::iter::Enumerate;
use std::str::Lines;

/// One line of a text artifact together with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy)]
enum ScanState<'a> {
    Searching,
    InBlock(LogicalLine<'a>),
}

/// Iterator over the lines following the first header accepted by `is_header`.
///
/// Yields nothing when no line matches. The caller decides where the block
/// ends by stopping iteration.
pub struct BlockScanner<'a, F> {
    lines: Enumerate<Lines<'a>>,
    is_header: F,
    state: ScanState<'a>,
}

impl<'a, F> BlockScanner<'a, F>
where
    F: Fn(&str) -> bool,
{
    pub fn new(content: &'a str, is_header: F) -> Self {
        Self {
            lines: content.lines().enumerate(),
            is_header,
            state: ScanState::Searching,
        }
    }

    /// Advance past the header line and return it, or `None` if the content
    /// has no matching header. Calling this again returns the same header.
    pub fn seek_header(&mut self) -> Option<LogicalLine<'a>> {
        if let ScanState::InBlock(header) = self.state {
            return Some(header);
        }

        for (idx, text) in self.lines.by_ref() {
            if (self.is_header)(text) {
                let line = LogicalLine {
                    number: idx + 1,
                    text,
                };
                self.state = ScanState::InBlock(line);
                return Some(line);
            }
        }
        None
    }
}

impl<'a, F> Iterator for BlockScanner<'a, F>
where
    F: Fn(&str) -> bool,
{
    type Item = LogicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let ScanState::Searching = self.state {
            self.seek_header()?;
        }
        let (idx, text) = self.lines.next()?;
        Some(LogicalLine {
            number: idx + 1,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "alpha\nDEF first\none\ntwo\nDEF first_again\nthree";

    #[test]
    fn test_yields_lines_after_first_header() {
        let scanner = BlockScanner::new(CONTENT, |line| line.starts_with("DEF"));
        let texts: Vec<&str> = scanner.map(|line| line.text).collect();
        assert_eq!(texts, vec!["one", "two", "DEF first_again", "three"]);
    }

    #[test]
    fn test_header_line_number() {
        let mut scanner = BlockScanner::new(CONTENT, |line| line.contains("first"));
        let header = scanner.seek_header().expect("header should match");
        assert_eq!(header.number, 2);
        assert_eq!(header.text, "DEF first");

        // Seeking again must not move past the block
        assert_eq!(scanner.seek_header(), Some(header));
        assert_eq!(scanner.next().map(|l| l.number), Some(3));
    }

    #[test]
    fn test_no_header_yields_nothing() {
        let mut scanner = BlockScanner::new(CONTENT, |line| line.starts_with("ENDDEF"));
        assert!(scanner.next().is_none());
        assert!(scanner.seek_header().is_none());
    }

    #[test]
    fn test_substring_predicate_takes_first_block() {
        let mut scanner = BlockScanner::new(CONTENT, |line| {
            line.starts_with("DEF") && line.contains("first")
        });
        assert_eq!(scanner.seek_header().map(|l| l.text), Some("DEF first"));
    }
}
