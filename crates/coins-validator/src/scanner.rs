//! Line scanning and value unquoting for the profile DSL

use std::io::{self, BufRead};

/// Trimmed-line reader over a profile stream.
///
/// `next_line` skips blank and `#` comment lines; `next_raw_line` keeps
/// blank lines for query sub-blocks, where the caller decides what to drop.
/// Bytes that are not UTF-8 decode to U+FFFD; only stream failures are errors.
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// Number of physical lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next trimmed line that is neither blank nor a comment.
    pub fn next_line(&mut self) -> Option<io::Result<String>> {
        loop {
            match self.next_raw_line()? {
                Ok(line) if line.is_empty() || line.starts_with('#') => continue,
                other => return Some(other),
            }
        }
    }

    /// Next trimmed line, blank lines and comments included.
    pub fn next_raw_line(&mut self) -> Option<io::Result<String>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(Ok(String::from_utf8_lossy(&self.buf).trim().to_string()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

/// Strip surrounding double quotes, tolerating doubled or one-sided quoting.
pub fn unquote(value: &str) -> String {
    let mut value = value.trim();
    while let Some(rest) = value.strip_prefix('"') {
        value = rest.trim();
    }
    while let Some(rest) = value.strip_suffix('"') {
        value = rest.trim();
    }
    value.to_string()
}

/// Value of a `Keyword value` directive line.
///
/// A line without a space yields itself.
pub(crate) fn directive_value(line: &str) -> String {
    let raw = line.split_once(' ').map(|(_, value)| value).unwrap_or(line);
    unquote(raw)
}

/// Closing tags match on the end of the trimmed line, so `foo </Tag>` closes too.
pub(crate) fn closes(line: &str, end_tag: &str) -> bool {
    line.ends_with(end_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn lines(input: &str) -> Vec<String> {
        LineScanner::new(Cursor::new(input))
            .map(|line| line.unwrap())
            .collect()
    }

    #[test]
    fn test_scanner_skips_blank_and_comment_lines() {
        let input = "  ProfileName Demo  \n\n   \n# comment\n   # indented comment\nProfileAuthor x\n";
        assert_eq!(lines(input), vec!["ProfileName Demo", "ProfileAuthor x"]);
    }

    #[test]
    fn test_scanner_handles_missing_trailing_newline_and_crlf() {
        assert_eq!(lines("a\r\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_raw_lines_keep_blanks_and_comments() {
        let mut scanner = LineScanner::new(Cursor::new("x\n\n# c\n"));
        assert_eq!(scanner.next_raw_line().unwrap().unwrap(), "x");
        assert_eq!(scanner.next_raw_line().unwrap().unwrap(), "");
        assert_eq!(scanner.next_raw_line().unwrap().unwrap(), "# c");
        assert!(scanner.next_raw_line().is_none());
        assert_eq!(scanner.line_number(), 3);
    }

    #[test]
    fn test_scanner_decodes_invalid_utf8_lossily() {
        let mut scanner = LineScanner::new(Cursor::new(b"Caf\xe9 \n\xff\xfe\nnext\n".to_vec()));
        assert_eq!(scanner.next_line().unwrap().unwrap(), "Caf\u{FFFD}");
        assert_eq!(scanner.next_line().unwrap().unwrap(), "\u{FFFD}\u{FFFD}");
        assert_eq!(scanner.next_line().unwrap().unwrap(), "next");
        assert!(scanner.next_line().is_none());
    }

    #[test]
    fn test_unquote_variants() {
        assert_eq!(unquote("\"Demo\""), "Demo");
        assert_eq!(unquote("\"\"Demo\"\""), "Demo");
        assert_eq!(unquote("\" Demo \" "), "Demo");
        assert_eq!(unquote("\"Demo"), "Demo");
        assert_eq!(unquote("Demo\""), "Demo");
        assert_eq!(unquote("  \"Demo\""), "Demo");
        assert_eq!(unquote("say \"hi\" now"), "say \"hi\" now");
        assert_eq!(unquote("\""), "");
        assert_eq!(unquote(""), "");
    }

    #[test]
    fn test_directive_value() {
        assert_eq!(directive_value("ProfileName \"COINS 2.0 Lite\""), "COINS 2.0 Lite");
        assert_eq!(directive_value("Reference R1"), "R1");
        assert_eq!(directive_value("ProfileName"), "ProfileName");
    }

    #[test]
    fn test_closing_tag_is_suffix_match() {
        assert!(closes("</ValidationRule>", "</ValidationRule>"));
        assert!(closes("trailing text </ValidationRule>", "</ValidationRule>"));
        assert!(!closes("</ValidationRule> trailing", "</ValidationRule>"));
    }

    proptest! {
        #[test]
        fn prop_unquote_is_idempotent(s in "[ \"a-zA-Z0-9\t]{0,24}") {
            let once = unquote(&s);
            prop_assert_eq!(unquote(&once), once);
        }

        #[test]
        fn prop_unquote_leaves_no_outer_quotes(s in "\\PC{0,32}") {
            let out = unquote(&s);
            prop_assert!(!out.starts_with('"'));
            prop_assert!(!out.ends_with('"'));
        }
    }
}
