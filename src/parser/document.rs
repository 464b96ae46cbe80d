// Author: Dustin Pilgrim
// License: MIT

use std::mem;

use super::*;
use crate::node::{reserved_key_char, Entry};

/// Scanner state for the statement currently being read.
struct Statement {
    key: String,
    value: String,
    in_key: bool,
    openers: Vec<(char, Position)>,
    body_start: Position,
    // A block or list was installed; only whitespace may follow on this line.
    closed: bool,
}

impl Statement {
    fn new() -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            in_key: true,
            openers: Vec::new(),
            body_start: Position::START,
            closed: false,
        }
    }

    fn reset(&mut self) {
        self.key.clear();
        self.value.clear();
        self.in_key = true;
        self.closed = false;
    }

    fn push(&mut self, ch: char) {
        if self.in_key {
            self.key.push(ch);
        } else {
            self.value.push(ch);
        }
    }

    fn error(&self, message: impl Into<String>, at: Position, hint: Option<&str>, code: u32) -> JcfError {
        malformed(message, at, &self.key, &self.value, hint, code)
    }
}

pub(super) fn parse_document(parser: &mut Parser) -> Result<Node, JcfError> {
    let mut node = Node::new();
    let mut stmt = Statement::new();

    while let Some((ch, at)) = parser.bump() {
        let top_level = stmt.openers.is_empty();

        if stmt.closed && top_level && ch != '\n' {
            if ch.is_whitespace() {
                continue;
            }
            return Err(stmt.error(
                format!("Unexpected '{}' after a closed block or list", ch),
                at,
                Some("Put each key on its own line"),
                207,
            ));
        }

        match ch {
            '{' | '[' => open(parser, &mut stmt, ch, at)?,
            '}' | ']' => {
                if let Some((key, entry)) = close(&mut stmt, ch, at)? {
                    node.insert(key, entry);
                }
            }
            ':' if top_level => {
                if stmt.in_key {
                    stmt.in_key = false;
                } else {
                    stmt.value.push(':');
                }
            }
            '\n' if top_level => end_statement(&mut node, &mut stmt, at)?,
            _ => stmt.push(ch),
        }
    }

    if let Some(&(opener, at)) = stmt.openers.first() {
        return Err(stmt.error(
            format!("Unterminated {} opened here", delimiter_name(opener)),
            at,
            Some(if opener == '{' { "Close the block with '}'" } else { "Close the list with ']'" }),
            205,
        ));
    }

    // A last line without a trailing newline still counts.
    let end = parser.position();
    end_statement(&mut node, &mut stmt, end)?;

    Ok(node)
}

fn open(parser: &Parser, stmt: &mut Statement, ch: char, at: Position) -> Result<(), JcfError> {
    if stmt.openers.is_empty() {
        if stmt.in_key || !stmt.value.trim().is_empty() {
            return Err(stmt.error(
                format!("A {} can only open as the value of `key:`", delimiter_name(ch)),
                at,
                Some("Write `name: {` or `name: [`"),
                201,
            ));
        }
        if stmt.key.trim().is_empty() {
            return Err(stmt.error(
                format!("A {} needs a key", delimiter_name(ch)),
                at,
                None,
                209,
            ));
        }
        stmt.value.clear();
        stmt.body_start = parser.position();
    }

    stmt.openers.push((ch, at));
    if stmt.openers.len() > 1 {
        stmt.value.push(ch);
    }
    Ok(())
}

fn close(stmt: &mut Statement, ch: char, at: Position) -> Result<Option<(String, Entry)>, JcfError> {
    let expected = if ch == '}' { '{' } else { '[' };
    match stmt.openers.last() {
        None => {
            return Err(stmt.error(
                format!("Cannot close an unopened {}", delimiter_name(ch)),
                at,
                None,
                202,
            ));
        }
        Some(&(top, _)) if top != expected => {
            let wanted = if top == '{' { '}' } else { ']' };
            return Err(stmt.error(
                format!("Encountered '{}', expected '{}'", ch, wanted),
                at,
                None,
                203,
            ));
        }
        _ => {}
    }

    stmt.openers.pop();
    if !stmt.openers.is_empty() {
        stmt.value.push(ch);
        return Ok(None);
    }

    let key = stmt.key.trim().to_string();
    check_key(&key, stmt, at)?;

    let body = mem::take(&mut stmt.value);
    let entry = if ch == '}' {
        Entry::Block(Parser::with_origin(&body, stmt.body_start).parse_document()?)
    } else {
        Entry::List(list::split_list(&body, stmt.body_start, &key)?)
    };

    stmt.key.clear();
    stmt.closed = true;
    Ok(Some((key, entry)))
}

fn end_statement(node: &mut Node, stmt: &mut Statement, at: Position) -> Result<(), JcfError> {
    if stmt.closed {
        stmt.reset();
        return Ok(());
    }

    let key = stmt.key.trim();
    let value = stmt.value.trim();

    if stmt.in_key {
        if !key.is_empty() {
            return Err(stmt.error(
                "Unexpected end of line, expected ':'",
                at,
                Some("Every line must look like `key: value`"),
                204,
            ));
        }
    } else if key.is_empty() {
        if !value.is_empty() {
            return Err(stmt.error("Value without a key", at, None, 206));
        }
    } else {
        check_key(key, stmt, at)?;
        node.set_value(key, value);
    }

    stmt.reset();
    Ok(())
}

fn check_key(key: &str, stmt: &Statement, at: Position) -> Result<(), JcfError> {
    if let Some(bad) = reserved_key_char(key) {
        return Err(stmt.error(
            format!("Key '{}' contains '{}'", key, bad),
            at,
            Some("'.', '#' and '$' are path and interpolation syntax; nest a block instead"),
            208,
        ));
    }
    Ok(())
}
