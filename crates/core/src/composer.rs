//! Block Composer
//!
//! Builds the nested, indentation-formatted documents Gradle reads
//! (`build.gradle`). Blocks are tracked on an explicit stack so a close
//! without a matching open is reported instead of producing negative
//! indentation.
//!
//! Output format:
//! - one indentation unit is four spaces
//! - every line ends with CRLF
//! - a blank line is emitted before a block header only when the buffer is
//!   non-empty and fewer than two blocks are open

use std::fmt::Display;

/// Indentation unit written once per open block.
pub const INDENT: &str = "    ";

/// Line terminator used for every generated line.
pub const LINE_BREAK: &str = "\r\n";

/// Blocks opened at a depth below this get a separating blank line.
const SEPARATED_DEPTH: usize = 2;

/// Composer errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("end_block called with no open block")]
    UnbalancedClose,
    #[error("document finished with unclosed blocks: {}", open.join(" > "))]
    UnclosedBlocks { open: Vec<String> },
}

/// How a line renders its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// `key value`, or just `key` when the value is empty
    #[default]
    Plain,
    /// `key = value`
    Assignment,
}

/// Nested block document builder
#[derive(Debug, Clone, Default)]
pub struct BlockComposer {
    buffer: String,
    open: Vec<String>,
}

impl BlockComposer {
    /// Create an empty composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open blocks
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Open a block: `name {`
    pub fn begin_block(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.buffer.is_empty() && self.depth() < SEPARATED_DEPTH {
            self.buffer.push_str(LINE_BREAK);
        }
        self.indent();
        self.buffer.push_str(&name);
        self.buffer.push_str(" {");
        self.buffer.push_str(LINE_BREAK);
        self.open.push(name);
        self
    }

    /// Write a line in the given style
    pub fn entry(&mut self, key: &str, value: impl Display, style: LineStyle) -> &mut Self {
        let value = value.to_string();
        self.indent();
        self.buffer.push_str(key);
        match style {
            LineStyle::Assignment => {
                self.buffer.push_str(" = ");
                self.buffer.push_str(&value);
            }
            LineStyle::Plain if value.is_empty() => {}
            LineStyle::Plain => {
                self.buffer.push(' ');
                self.buffer.push_str(&value);
            }
        }
        self.buffer.push_str(LINE_BREAK);
        self
    }

    /// `key value`
    pub fn line(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.entry(key, value, LineStyle::Plain)
    }

    /// `key = value`
    pub fn assign(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.entry(key, value, LineStyle::Assignment)
    }

    /// A bare key, e.g. `google()`
    pub fn flag(&mut self, key: &str) -> &mut Self {
        self.entry(key, "", LineStyle::Plain)
    }

    /// Close the innermost open block.
    ///
    /// Fails without touching the buffer when no block is open.
    pub fn end_block(&mut self) -> Result<&mut Self, ComposeError> {
        if self.open.pop().is_none() {
            return Err(ComposeError::UnbalancedClose);
        }
        self.indent();
        self.buffer.push('}');
        self.buffer.push_str(LINE_BREAK);
        Ok(self)
    }

    /// The text accumulated so far, balanced or not
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Consume the composer, requiring every block to be closed
    pub fn finish(self) -> Result<String, ComposeError> {
        if self.open.is_empty() {
            Ok(self.buffer)
        } else {
            Err(ComposeError::UnclosedBlocks { open: self.open })
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth() {
            self.buffer.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_line_at_depth_two() {
        let mut c = BlockComposer::new();
        c.begin_block("android").begin_block("defaultConfig");
        let before = c.text().len();
        c.line("minSdkVersion", 19);
        assert_eq!(&c.text()[before..], "        minSdkVersion 19\r\n");
    }

    #[test]
    fn test_line_styles() {
        let mut plain = BlockComposer::new();
        plain.line("multiDexEnabled", true);
        assert_eq!(plain.text(), "multiDexEnabled true\r\n");

        let mut assigned = BlockComposer::new();
        assigned.assign("multiDexEnabled", true);
        assert_eq!(assigned.text(), "multiDexEnabled = true\r\n");

        let mut bare = BlockComposer::new();
        bare.flag("google()");
        assert_eq!(bare.text(), "google()\r\n");
    }

    #[test]
    fn test_blank_line_only_below_depth_two() {
        let mut c = BlockComposer::new();
        c.begin_block("a")
            .begin_block("b")
            .begin_block("c")
            .line("k", "v");
        c.end_block().unwrap().end_block().unwrap().end_block().unwrap();
        c.begin_block("d");
        c.end_block().unwrap();

        let expected = "a {\r\n\
                        \r\n    b {\r\n\
                        \x20       c {\r\n\
                        \x20           k v\r\n\
                        \x20       }\r\n\
                        \x20   }\r\n\
                        }\r\n\
                        \r\nd {\r\n\
                        }\r\n";
        assert_eq!(c.text(), expected);
    }

    #[test]
    fn test_unbalanced_close_preserves_buffer() {
        let mut c = BlockComposer::new();
        c.begin_block("plugins").flag("id 'kotlin-android'");
        c.end_block().unwrap();
        let snapshot = c.text().to_string();

        assert_eq!(c.end_block().unwrap_err(), ComposeError::UnbalancedClose);
        assert_eq!(c.text(), snapshot);
        assert_eq!(c.depth(), 0);
    }

    /// Asserts every `}` sits at its header's indentation; returns the
    /// number of blocks
    fn assert_matched_indentation(text: &str) -> usize {
        let mut stack = Vec::new();
        let mut opens = 0;
        let mut closes = 0;
        for line in text.split(LINE_BREAK).filter(|l| !l.is_empty()) {
            let indent = line.len() - line.trim_start().len();
            if line.ends_with(" {") {
                opens += 1;
                stack.push(indent);
            } else if line.trim() == "}" {
                closes += 1;
                assert_eq!(stack.pop(), Some(indent));
            }
        }
        assert_eq!(opens, closes);
        assert!(stack.is_empty());
        opens
    }

    #[test]
    fn test_close_indent_matches_open() {
        let mut c = BlockComposer::new();
        c.begin_block("one").begin_block("two").begin_block("three");
        c.line("x", 1);
        c.end_block().unwrap();
        c.begin_block("four");
        c.end_block().unwrap().end_block().unwrap().end_block().unwrap();
        let text = c.finish().unwrap();

        assert_eq!(assert_matched_indentation(&text), 4);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            .. ProptestConfig::default()
        })]

        /// Any balanced sequence of opens, lines and closes yields matched
        /// headers and closers.
        #[test]
        fn property_balanced_sequences_match(ops in proptest::collection::vec(0u8..3, 0..64)) {
            let mut c = BlockComposer::new();
            let mut opened = 0;
            for (i, op) in ops.iter().enumerate() {
                match op {
                    0 => {
                        c.begin_block(format!("block{}", i));
                        opened += 1;
                    }
                    1 => {
                        c.line("key", i);
                    }
                    _ if c.depth() > 0 => {
                        c.end_block().unwrap();
                    }
                    _ => {
                        prop_assert_eq!(c.end_block().unwrap_err(), ComposeError::UnbalancedClose);
                    }
                }
            }
            while c.depth() > 0 {
                c.end_block().unwrap();
            }

            let text = c.finish().unwrap();
            prop_assert_eq!(assert_matched_indentation(&text), opened);
        }
    }

    #[test]
    fn test_finish_reports_open_blocks() {
        let mut c = BlockComposer::new();
        c.begin_block("android").begin_block("buildTypes");
        assert!(c.text().ends_with("    buildTypes {\r\n"));

        match c.finish() {
            Err(ComposeError::UnclosedBlocks { open }) => {
                assert_eq!(open, vec!["android".to_string(), "buildTypes".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
