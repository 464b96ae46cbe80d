use super::*;

/// Split the body of a closed `[...]` into one node per top-level `{...}`.
///
/// Whitespace and commas may separate elements. A `[` at element level is
/// rejected: lists only nest inside blocks.
pub(super) fn split_list(body: &str, origin: Position, key: &str) -> Result<Vec<Node>, JcfError> {
    let mut scanner = Parser::with_origin(body, origin);
    let mut items = Vec::new();
    let mut current = String::new();
    let mut openers: Vec<(char, Position)> = Vec::new();
    let mut start = origin;

    while let Some((ch, at)) = scanner.bump() {
        match ch {
            '{' => {
                if openers.is_empty() {
                    current.clear();
                    start = scanner.position();
                } else {
                    current.push('{');
                }
                openers.push(('{', at));
            }
            '[' => {
                if openers.is_empty() {
                    return Err(malformed(
                        "Lists can only contain blocks, not other lists",
                        at,
                        key,
                        body,
                        Some("Wrap the inner list in a block: `[ { inner: [ ... ] } ]`"),
                        210,
                    ));
                }
                openers.push(('[', at));
                current.push('[');
            }
            '}' | ']' => {
                let expected = if ch == '}' { '{' } else { '[' };
                match openers.last() {
                    None => {
                        return Err(malformed(
                            format!("Cannot close an unopened {}", delimiter_name(ch)),
                            at,
                            key,
                            body,
                            None,
                            202,
                        ));
                    }
                    Some(&(top, _)) if top != expected => {
                        let wanted = if top == '{' { '}' } else { ']' };
                        return Err(malformed(
                            format!("Encountered '{}', expected '{}'", ch, wanted),
                            at,
                            key,
                            &current,
                            None,
                            203,
                        ));
                    }
                    _ => {}
                }

                openers.pop();
                if openers.is_empty() {
                    items.push(Parser::with_origin(&current, start).parse_document()?);
                    current.clear();
                } else {
                    current.push(ch);
                }
            }
            _ if openers.is_empty() => {
                if ch.is_whitespace() || ch == ',' {
                    continue;
                }
                return Err(malformed(
                    format!("Unexpected '{}' between list elements", ch),
                    at,
                    key,
                    body,
                    Some("A list holds only `{ ... }` blocks"),
                    211,
                ));
            }
            _ => current.push(ch),
        }
    }

    if let Some(&(opener, at)) = openers.first() {
        return Err(malformed(
            format!("Unterminated {} inside list", delimiter_name(opener)),
            at,
            key,
            &current,
            None,
            205,
        ));
    }

    Ok(items)
}
