//! Reader and writer for the `java.util.Properties` line format.
//!
//! Gradle scripts load `key.properties` and `local.properties` through
//! `Properties.load(InputStream)`, so this module follows the same rules:
//! ISO-8859-1 input, `#`/`!` comments, `=`/`:`/whitespace separators,
//! backslash line continuations and `\uXXXX` escapes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{KeypropsError, Result};

/// A flat set of string keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

/// Syntax error found while parsing properties text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based number of the natural line the logical line started on.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the properties file at `path`.
    ///
    /// The file is expected to exist; a missing file is reported as
    /// [`KeypropsError::Io`] like any other read failure.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| KeypropsError::io(path, e))?;
        Self::parse_bytes(&bytes).map_err(|e| KeypropsError::ConfigParse {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })
    }

    /// Parses raw file contents, decoding them as ISO-8859-1.
    pub fn parse_bytes(bytes: &[u8]) -> std::result::Result<Self, ParseError> {
        let text: String = bytes.iter().map(|&b| char::from(b)).collect();
        Self::parse_str(&text)
    }

    /// Parses already-decoded properties text.
    pub fn parse_str(text: &str) -> std::result::Result<Self, ParseError> {
        let mut props = Properties::new();

        for (line, logical) in logical_lines(text) {
            let (key, value) = split_entry(&logical);
            let key = unescape(key, line)?;
            let value = unescape(value, line)?;
            props.entries.insert(key, value);
        }

        Ok(props)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sets `key`, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes all entries in key order, one `key=value` line each.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            write_entry(&mut out, key, value);
        }
        out
    }
}

/// Appends one escaped `key=value` line to `out`.
///
/// The output only contains printable ASCII, so it survives the
/// ISO-8859-1 decoding done by [`Properties::parse_bytes`].
pub fn write_entry(out: &mut String, key: &str, value: &str) {
    escape_into(out, key, true);
    out.push('=');
    escape_into(out, value, false);
    out.push('\n');
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn natural_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Joins continuation lines and drops blanks and comments.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let natural = natural_lines(text);
    let mut out = Vec::new();
    let mut i = 0;

    while i < natural.len() {
        let line_no = i + 1;
        let first = natural[i].trim_start_matches(is_blank);
        i += 1;

        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut logical = first.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            let Some(next) = natural.get(i) else {
                break;
            };
            logical.push_str(next.trim_start_matches(is_blank));
            i += 1;
        }

        out.push((line_no, logical));
    }

    out
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if !escaped && (c == '=' || c == ':') {
            key_end = idx;
            value_start = idx + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_blank(c) {
            key_end = idx;
            value_start = idx + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    let rest = &line[value_start..];
    let mut value_offset = rest.len();
    for (idx, c) in rest.char_indices() {
        if is_blank(c) {
            continue;
        }
        if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            continue;
        }
        value_offset = idx;
        break;
    }

    (&line[..key_end], &rest[value_offset..])
}

fn unescape(raw: &str, line: usize) -> std::result::Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let unit = read_utf16_unit(&mut chars, line)?;
                out.push(decode_unit(unit, &mut chars, line)?);
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn malformed(line: usize, message: &str) -> ParseError {
    ParseError {
        line,
        message: message.to_string(),
    }
}

fn read_utf16_unit(
    chars: &mut std::str::Chars<'_>,
    line: usize,
) -> std::result::Result<u16, ParseError> {
    let mut unit: u16 = 0;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| malformed(line, "malformed \\uxxxx encoding"))?;
        unit = (unit << 4) | digit as u16;
    }
    Ok(unit)
}

/// Turns a UTF-16 code unit into a char, pulling a low surrogate escape from
/// `chars` when `unit` is a high surrogate.
fn decode_unit(
    unit: u16,
    chars: &mut std::str::Chars<'_>,
    line: usize,
) -> std::result::Result<char, ParseError> {
    if !(0xD800..=0xDFFF).contains(&unit) {
        return char::from_u32(u32::from(unit))
            .ok_or_else(|| malformed(line, "invalid \\uxxxx code point"));
    }
    if unit >= 0xDC00 {
        return Err(malformed(line, "unpaired surrogate in \\uxxxx escape"));
    }

    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return Err(malformed(line, "unpaired surrogate in \\uxxxx escape"));
    }
    let low = read_utf16_unit(&mut lookahead, line)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(malformed(line, "unpaired surrogate in \\uxxxx escape"));
    }
    *chars = lookahead;

    char::decode_utf16([unit, low])
        .next()
        .and_then(|r| r.ok())
        .ok_or_else(|| malformed(line, "invalid surrogate pair"))
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (idx, c) in text.chars().enumerate() {
        match c {
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
}
