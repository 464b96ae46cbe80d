// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;
use std::str::Chars;

use crate::node::Node;
use crate::JcfError;

mod document;
mod list;

/// Line (1-based) and column (1-based once a character has been read).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 0 };
}

/// Single-pass character scanner for JCF text.
///
/// Nested `{...}` and `[...]` bodies are buffered verbatim and handed to a
/// fresh `Parser` that starts at the body's position, so errors deep inside
/// a block still report where they are in the source file.
pub struct Parser<'a> {
    input: Chars<'a>,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_origin(input, Position::START)
    }

    pub(crate) fn with_origin(input: &'a str, origin: Position) -> Self {
        Self {
            input: input.chars(),
            line: origin.line,
            column: origin.column,
        }
    }

    /// Advance one character, returning it with its own position.
    pub(crate) fn bump(&mut self) -> Option<(char, Position)> {
        let ch = self.input.next()?;
        let at = Position {
            line: self.line,
            column: self.column + 1,
        };
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some((ch, at))
    }

    /// Position just after the last character read.
    pub(crate) fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    pub fn parse_document(&mut self) -> Result<Node, JcfError> {
        document::parse_document(self)
    }
}

/// Parse a complete JCF document.
pub fn parse(input: &str) -> Result<Node, JcfError> {
    Parser::new(input).parse_document()
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Node, JcfError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| JcfError::FileError {
        message: format!("Failed to read file: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(301),
    })?;
    log::debug!("parsing {} ({} bytes)", path.display(), content.len());
    parse(&content)
}

pub(crate) fn malformed(
    message: impl Into<String>,
    at: Position,
    key: &str,
    value: &str,
    hint: Option<&str>,
    code: u32,
) -> JcfError {
    JcfError::Malformed {
        message: message.into(),
        line: at.line,
        column: at.column,
        key: snippet(key),
        value: snippet(value),
        hint: hint.map(String::from),
        code: Some(code),
    }
}

fn snippet(text: &str) -> String {
    const MAX: usize = 40;
    let text = text.trim();
    if text.chars().count() <= MAX {
        text.replace('\n', "\\n")
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}...", cut.replace('\n', "\\n"))
    }
}

pub(crate) fn delimiter_name(ch: char) -> &'static str {
    match ch {
        '{' | '}' => "block",
        _ => "list",
    }
}

#[cfg(test)]
mod tests;
