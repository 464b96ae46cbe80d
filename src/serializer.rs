// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;

use crate::node::{reserved_key_char, unwritable_scalar, Entry, Node};
use crate::JcfError;

const INDENT: &str = "    ";

impl Node {
    /// Render this node as JCF text, scalars raw (uninterpolated).
    ///
    /// Nothing is checked here: a key or value set programmatically that the
    /// format cannot hold is written as-is. [`Node::save`] refuses such trees;
    /// call [`Node::check_writable`] before using this text elsewhere.
    pub fn save_string(&self) -> String {
        let mut out = String::new();
        write_entries(&mut out, self, 0);
        out
    }

    /// Write the tree to `path`. Fails without touching the file when the
    /// tree holds something that would not read back.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), JcfError> {
        let path = path.as_ref();
        self.check_writable()?;
        fs::write(path, self.save_string()).map_err(|e| JcfError::FileError {
            message: format!("Failed to write file: {}", e),
            path: path.to_string_lossy().to_string(),
            hint: Some("Check that the directory exists and is writable".into()),
            code: Some(303),
        })?;
        log::info!("saved configuration to {}", path.display());
        Ok(())
    }
}

impl Node {
    /// Check that [`Node::save_string`] reads back as this same tree.
    pub fn check_writable(&self) -> Result<(), JcfError> {
        check_node(self, "")
    }
}

fn check_node(node: &Node, at: &str) -> Result<(), JcfError> {
    for (key, entry) in node.iter() {
        let path = if at.is_empty() { key.to_string() } else { format!("{}.{}", at, key) };
        if key.is_empty() || key.trim() != key {
            return Err(JcfError::InvalidPath {
                path,
                message: "Keys must be non-empty and not padded with whitespace".into(),
                hint: None,
                code: Some(408),
            });
        }
        if let Some(bad) = reserved_key_char(key) {
            return Err(JcfError::InvalidPath {
                path,
                message: format!("Key '{}' contains '{}'", key.escape_debug(), bad.escape_debug()),
                hint: Some("Keys cannot contain '.', '#', '$', ':', brackets or line breaks".into()),
                code: Some(408),
            });
        }
        check_entry(entry, &path)?;
    }
    Ok(())
}

/// Check one entry (and everything under it) stored at `path`.
pub(crate) fn check_entry(entry: &Entry, path: &str) -> Result<(), JcfError> {
    match entry {
        Entry::Scalar(value) => match unwritable_scalar(value) {
            Some(reason) => Err(JcfError::InvalidValue {
                path: path.to_string(),
                message: format!("Cannot write '{}': {}", value.escape_debug(), reason),
                hint: Some("Scalars are one line without '{', '}', '[' or ']'".into()),
                code: Some(409),
            }),
            None => Ok(()),
        },
        Entry::Block(node) => check_node(node, path),
        Entry::List(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_node(item, &format!("{}#{}", path, i))),
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_entries(out: &mut String, node: &Node, depth: usize) {
    for (key, entry) in node.iter() {
        indent(out, depth);
        out.push_str(key);
        out.push(':');
        match entry {
            Entry::Scalar(value) => {
                if !value.is_empty() {
                    out.push(' ');
                    out.push_str(value);
                }
            }
            Entry::Block(child) => {
                out.push(' ');
                write_block(out, child, depth);
            }
            Entry::List(items) if items.is_empty() => out.push_str(" []"),
            Entry::List(items) => {
                out.push_str(" [\n");
                for item in items {
                    indent(out, depth + 1);
                    write_block(out, item, depth + 1);
                    out.push('\n');
                }
                indent(out, depth);
                out.push(']');
            }
        }
        out.push('\n');
    }
}

/// `{`, the body one level deeper, then `}` aligned with the opening line.
fn write_block(out: &mut String, node: &Node, depth: usize) {
    if node.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    write_entries(out, node, depth + 1);
    indent(out, depth);
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_save_string_layout() {
        let mut item = Node::new();
        item.set_value("X", "1");

        let mut inner = Node::new();
        inner.set_value("Port", "8080");

        let mut root = Node::new();
        root.set_value("Name", "srv");
        root.set_sub("Listener", inner);
        root.set_list("Routes", vec![item, Node::new()]);
        root.set_list("Empty", Vec::new());

        let expected = "\
Name: srv
Listener: {
    Port: 8080
}
Routes: [
    {
        X: 1
    }
    {}
]
Empty: []
";
        assert_eq!(root.save_string(), expected);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let input = "\
Server: {
    Name: MyServer
    Port: 8080
    Greeting: Hello $Name$
    Routes: [
        { Path: / }
        {
            Path: /docs
            Headers: {
                Cache: no-store
            }
        }
    ]
}
Blank:
Empty: {}
";
        let first = parse(input).expect("input parses");
        let text = first.save_string();
        let second = parse(&text).expect("saved text parses");
        assert_eq!(first, second);
        assert_eq!(second.save_string(), text);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jcf");

        let mut root = Node::new();
        root.override_value("A.B", "c").unwrap();
        root.save(&path).unwrap();

        let reloaded = crate::parser::parse_file(&path).unwrap();
        assert_eq!(reloaded.get_scalar("A.B").unwrap(), "c");
    }

    #[test]
    fn test_tree_built_by_writes_round_trips() {
        let mut root = Node::new();
        root.override_value("Listener.State.Port", " 8080 ").unwrap();
        root.override_value("Listener.State.Url", "http://localhost:$Port$/").unwrap();
        root.override_value("Listener.Name", "").unwrap();

        let mut route = Node::new();
        route.set_value("Path", "/a b");
        root.set_list("Routes", vec![route, Node::new()]);
        root.override_value("Routes#0.Target", "index.html").unwrap();
        root.set("Routes#1", Entry::Block(Node::new())).unwrap();
        root.check_writable().unwrap();

        let reread = parse(&root.save_string()).expect("saved text parses");
        assert_eq!(reread, root);
        assert_eq!(reread.get_raw("Listener.State.Port").unwrap(), "8080");
    }

    #[test]
    fn test_writes_reject_what_cannot_be_saved() {
        let mut root = Node::new();
        root.set_value("A", "1");

        let key_err = root.override_value("A2.K{", "1").unwrap_err();
        assert_eq!(key_err.code(), Some(408));
        assert_eq!(root.override_value("B.K:x", "1").unwrap_err().code(), Some(408));
        assert_eq!(root.override_value("B", "{oops").unwrap_err().code(), Some(409));
        assert_eq!(root.override_value("B", "two\nlines").unwrap_err().code(), Some(409));
        assert_eq!(root.set("A", Entry::Scalar("x]".into())).unwrap_err().code(), Some(409));

        // Nothing was created by the rejected writes.
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_save_refuses_unwritable_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jcf");

        let mut bad_value = Node::new();
        bad_value.set_value("B", "{oops");
        assert_eq!(bad_value.save(&path).unwrap_err().code(), Some(409));
        assert!(!path.exists());

        let mut inner = Node::new();
        inner.set_value("K{", "1");
        let mut bad_key = Node::new();
        bad_key.set_list("L", vec![inner]);
        let err = bad_key.check_writable().unwrap_err();
        assert!(matches!(err, JcfError::InvalidPath { ref path, code: Some(408), .. } if path == "L#0.K{"));
        assert!(bad_key.save(&path).is_err());
    }

    #[test]
    fn test_empty_root_saves_as_empty_text() {
        assert_eq!(Node::new().save_string(), "");
        assert!(parse("").unwrap().is_empty());
    }
}
