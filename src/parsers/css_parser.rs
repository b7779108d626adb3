//! Minimal CSS tokenizer for import extraction
//!
//! Only the tokens that reference other files are recognized: top-level
//! `@import`, `url(...)` anywhere outside comments and strings, and `@charset`.
//! Everything else is skipped, so malformed CSS never fails the scan.

use super::ParsedSource;
use crate::models::{ImportRecord, ImportSyntax, Span};

/// True for specifiers that point off the build entirely (`https://`, `//cdn`)
pub fn is_remote_url(specifier: &str) -> bool {
    specifier.starts_with("//") || specifier.contains("://")
}

/// Split a `?query` or `#hash` suffix off a `url()` target
///
/// The path part is what gets resolved; the suffix is carried over to the
/// rewritten URL.
pub fn split_url_suffix(value: &str) -> (&str, &str) {
    match value.find(['?', '#']) {
        Some(index) if index > 0 => value.split_at(index),
        _ => (value, ""),
    }
}

/// `url()` values that never reference a file
fn is_inert_url(value: &str) -> bool {
    value.is_empty()
        || value.starts_with('#')
        || value
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
        || is_remote_url(value)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

/// Extract import records and charset declarations from CSS source
pub fn parse_css(source: &str) -> ParsedSource {
    let mut tokenizer = Tokenizer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        depth: 0,
        parsed: ParsedSource::default(),
    };
    tokenizer.run();
    tokenizer.parsed
}

struct Tokenizer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    depth: usize,
    parsed: ParsedSource,
}

impl<'s> Tokenizer<'s> {
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'/' if self.peek(1) == Some(b'*') => self.skip_comment(),
                b'"' | b'\'' => {
                    self.read_string();
                }
                b'\\' => self.pos += 2,
                b'{' => {
                    self.depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.pos += 1;
                }
                b'@' => self.at_rule(),
                b'u' | b'U' if self.at_url_function() => self.url_token(),
                _ => self.pos += 1,
            }
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_comment(&mut self) {
        self.pos = match self.source[self.pos + 2..].find("*/") {
            Some(end) => self.pos + 2 + end + 2,
            None => self.bytes.len(),
        };
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.peek(0) == Some(b'/') && self.peek(1) == Some(b'*') {
                self.skip_comment();
            } else {
                return;
            }
        }
    }

    /// Read a quoted string starting at the opening quote
    ///
    /// Returns the unescaped value; an unterminated string ends at the newline.
    fn read_string(&mut self) -> String {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let mut value = String::new();

        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == quote {
                self.pos += 1;
                break;
            }
            if b == b'\n' {
                break;
            }
            if b == b'\\' {
                self.pos += 1;
                if let Some(c) = self.source[self.pos..].chars().next() {
                    // escaped newline is a line continuation
                    if c != '\n' {
                        value.push(c);
                    }
                    self.pos += c.len_utf8();
                }
                continue;
            }
            let Some(c) = self.source[self.pos..].chars().next() else {
                break;
            };
            value.push(c);
            self.pos += c.len_utf8();
        }
        value
    }

    fn read_ident(&mut self) -> &'s str {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_ident_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    fn at_url_function(&self) -> bool {
        let preceded_by_ident = self.pos > 0 && is_ident_byte(self.bytes[self.pos - 1]);
        !preceded_by_ident
            && self
                .source
                .get(self.pos..self.pos + 4)
                .is_some_and(|s| s.eq_ignore_ascii_case("url("))
    }

    /// Read `url(...)` starting at the `u`; returns the value and its start offset
    fn read_url(&mut self) -> (String, usize) {
        self.pos += 4;
        self.skip_whitespace_and_comments();
        let start = self.pos;

        let value = match self.peek(0) {
            Some(b'"') | Some(b'\'') => self.read_string(),
            _ => {
                while self.pos < self.bytes.len()
                    && self.bytes[self.pos] != b')'
                    && !self.bytes[self.pos].is_ascii_whitespace()
                {
                    self.pos += 1;
                }
                self.source[start..self.pos].to_string()
            }
        };

        while self.pos < self.bytes.len() && self.bytes[self.pos] != b')' {
            self.pos += 1;
        }
        self.pos = (self.pos + 1).min(self.bytes.len());
        (value, start)
    }

    fn url_token(&mut self) {
        let (value, start) = self.read_url();
        let value = value.trim().to_string();
        if is_inert_url(&value) {
            return;
        }
        let span = Span::locate(self.source, start, self.pos.saturating_sub(1));
        self.parsed
            .records
            .push(ImportRecord::new(value, ImportSyntax::UrlToken, span));
    }

    fn at_rule(&mut self) {
        self.pos += 1;
        let name = self.read_ident();

        if name.eq_ignore_ascii_case("import") && self.depth == 0 {
            self.import_rule();
        } else if name.eq_ignore_ascii_case("charset") {
            self.skip_whitespace_and_comments();
            if matches!(self.peek(0), Some(b'"') | Some(b'\'')) {
                let charset = self.read_string();
                self.parsed.charsets.push(charset);
            }
        }
    }

    fn import_rule(&mut self) {
        self.skip_whitespace_and_comments();
        let start = self.pos;

        let specifier = match self.peek(0) {
            Some(b'"') | Some(b'\'') => self.read_string(),
            Some(b'u') | Some(b'U') if self.at_url_function() => self.read_url().0,
            _ => return,
        };

        if specifier.is_empty() {
            return;
        }
        let span = Span::locate(self.source, start, self.pos);
        self.parsed
            .records
            .push(ImportRecord::new(specifier, ImportSyntax::AtImport, span));
    }
}
