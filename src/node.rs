// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a key holds inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Scalar(String),
    Block(Node),
    List(Vec<Node>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Scalar,
    Block,
    List,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Scalar => write!(f, "scalar"),
            EntryKind::Block => write!(f, "block"),
            EntryKind::List => write!(f, "list"),
        }
    }
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Scalar(_) => EntryKind::Scalar,
            Entry::Block(_) => EntryKind::Block,
            Entry::List(_) => EntryKind::List,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        if let Entry::Scalar(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    pub fn as_block(&self) -> Option<&Node> {
        if let Entry::Block(node) = self {
            Some(node)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        if let Entry::List(items) = self {
            Some(items.as_slice())
        } else {
            None
        }
    }
}

/// One block of a JCF document.
///
/// Every key maps to exactly one [`Entry`], so a key can never be a scalar
/// and a block at the same time: writing a key replaces whatever it held.
/// Children are owned outright; there is no stored parent pointer. The
/// ancestor chain needed for `$name$` fallback lives in [`crate::NodeRef`].
///
/// Reads on a `Node` start a new root scope. A block reached through
/// [`Node::subs`], [`Node::entry`] or [`Entry::as_block`] has lost its
/// ancestors, so `$name$` references to enclosing blocks fail there; read
/// through [`crate::NodeRef::get_child`] to keep the fallback chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    entries: IndexMap<String, Entry>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Single-level lookup, no path syntax.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    pub(crate) fn entry_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> Entry) -> &mut Entry {
        self.entries.entry(key.to_string()).or_insert_with(make)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Entry::Scalar(value.into()));
    }

    pub fn set_sub(&mut self, key: impl Into<String>, node: Node) {
        self.entries.insert(key.into(), Entry::Block(node));
    }

    pub fn set_list(&mut self, key: impl Into<String>, list: Vec<Node>) {
        self.entries.insert(key.into(), Entry::List(list));
    }

    /// Store `entry` under `key`, returning what the key held before.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(key)
    }

    /// Scalars stored directly in this block, raw (not interpolated).
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            Entry::Scalar(s) => Some((k.as_str(), s.as_str())),
            _ => None,
        })
    }

    pub fn subs(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            Entry::Block(node) => Some((k.as_str(), node)),
            _ => None,
        })
    }

    pub fn lists(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.entries.iter().filter_map(|(k, v)| match v {
            Entry::List(items) => Some((k.as_str(), items.as_slice())),
            _ => None,
        })
    }
}

/// Characters no key may contain: path syntax, interpolation markers and
/// the delimiters of the text format.
pub(crate) const RESERVED_KEY_CHARS: [char; 8] = ['.', '#', '$', ':', '{', '}', '[', ']'];

/// The first character that keeps `key` from being written and read back.
pub(crate) fn reserved_key_char(key: &str) -> Option<char> {
    key.chars()
        .find(|c| RESERVED_KEY_CHARS.contains(c) || matches!(*c, '\n' | '\r'))
}

/// Why `value` cannot be stored as a scalar line, if it cannot.
pub(crate) fn unwritable_scalar(value: &str) -> Option<&'static str> {
    if value.contains(['\n', '\r']) {
        Some("scalars are single-line")
    } else if value.contains(['{', '}', '[', ']']) {
        Some("brackets in a scalar would open or close a block or list")
    } else if value.trim() != value {
        Some("leading and trailing whitespace is not kept")
    } else {
        None
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.save_string())
    }
}
