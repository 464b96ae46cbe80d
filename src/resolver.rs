// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

use crate::interpolate::{self, Expansion};
use crate::node::{reserved_key_char, unwritable_scalar, Entry, EntryKind, Node};
use crate::serializer;
use crate::JcfError;

/// One step of a dotted path: `name` or `name#index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}#{}", self.name, i),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A parsed query path such as `Listener.Routes#2.Target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathKey {
    segments: Vec<Segment>,
}

impl PathKey {
    /// Parse a dotted path. The empty string is the empty path (the node itself).
    pub fn parse(path: &str) -> Result<Self, JcfError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Ok(Self { segments: Vec::new() });
        }

        let mut segments = Vec::new();
        for raw in trimmed.split('.') {
            let raw = raw.trim();
            let (name, index) = match raw.split_once('#') {
                Some((name, idx)) => {
                    let index = idx.trim().parse::<usize>().map_err(|_| JcfError::InvalidPath {
                        path: trimmed.to_string(),
                        message: format!("Invalid list index '{}' in segment '{}'", idx, raw),
                        hint: Some("Indexes are non-negative integers: `name#0`".into()),
                        code: Some(403),
                    })?;
                    (name.trim(), Some(index))
                }
                None => (raw, None),
            };

            if name.is_empty() {
                return Err(JcfError::InvalidPath {
                    path: trimmed.to_string(),
                    message: "Empty path segment".into(),
                    hint: Some("Check for doubled or trailing dots".into()),
                    code: Some(404),
                });
            }

            if let Some(bad) = reserved_key_char(name) {
                return Err(JcfError::InvalidPath {
                    path: trimmed.to_string(),
                    message: format!("Segment '{}' contains '{}'", name, bad),
                    hint: Some("Keys cannot contain '$', ':', brackets or line breaks".into()),
                    code: Some(408),
                });
            }

            segments.push(Segment { name: name.to_string(), index });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All but the last segment, and the last segment.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(Segment::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A borrowed view of a node together with the ancestors walked to reach it.
///
/// The ancestor chain is what `$name$` interpolation falls back through. It
/// never grants access to siblings; resolution only ever walks downwards.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    node: &'a Node,
    ancestors: Vec<&'a Node>,
}

/// What a path resolved to, plus the node that holds it.
pub(crate) struct Resolved<'a> {
    pub holder: NodeRef<'a>,
    pub target: Target<'a>,
}

#[derive(Clone, Copy)]
pub(crate) enum Target<'a> {
    Entry(&'a Entry),
    Element(&'a Node),
}

impl<'a> NodeRef<'a> {
    /// A root scope: no ancestors, so interpolation fallback ends here.
    pub fn root(node: &'a Node) -> Self {
        Self { node, ancestors: Vec::new() }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let (parent, rest) = self.ancestors.split_last()?;
        Some(NodeRef {
            node: parent,
            ancestors: rest.to_vec(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.ancestors.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    fn child(&self, node: &'a Node) -> NodeRef<'a> {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(self.node);
        NodeRef { node, ancestors }
    }

    pub(crate) fn resolve(&self, path: &PathKey) -> Result<Resolved<'a>, JcfError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(JcfError::InvalidPath {
                path: String::new(),
                message: "Empty path".into(),
                hint: None,
                code: Some(404),
            });
        };

        let mut holder = self.clone();
        for (i, seg) in parents.iter().enumerate() {
            let next = holder
                .step_into(seg)
                .map_err(|e| prefix(e, &parents[..i]))?;
            holder = holder.child(next);
        }

        let target = match last.index {
            Some(index) => Target::Element(holder.element(last, index).map_err(|e| prefix(e, parents))?),
            None => Target::Entry(holder.lookup(&last.name).map_err(|e| prefix(e, parents))?),
        };

        Ok(Resolved { holder, target })
    }

    fn lookup(&self, name: &str) -> Result<&'a Entry, JcfError> {
        self.node.entry(name).ok_or_else(|| JcfError::UnknownKey {
            path: name.to_string(),
            segment: name.to_string(),
            hint: None,
            code: Some(401),
        })
    }

    fn element(&self, seg: &Segment, index: usize) -> Result<&'a Node, JcfError> {
        let entry = self.lookup(&seg.name)?;
        let Entry::List(items) = entry else {
            return Err(wrong_type(&seg.to_string(), EntryKind::List, entry.kind()));
        };
        items.get(index).ok_or_else(|| JcfError::UnknownKey {
            path: seg.to_string(),
            segment: seg.to_string(),
            hint: Some(format!("List '{}' has {} element(s)", seg.name, items.len())),
            code: Some(402),
        })
    }

    /// Resolve one intermediate segment, which must lead to a block.
    fn step_into(&self, seg: &Segment) -> Result<&'a Node, JcfError> {
        if let Some(index) = seg.index {
            return self.element(seg, index);
        }
        match self.lookup(&seg.name)? {
            Entry::Block(node) => Ok(node),
            other => Err(wrong_type(&seg.name, EntryKind::Block, other.kind())),
        }
    }

    /// Raw entry at `path`; `name#i` paths are not entries and report WrongType.
    pub fn get(&self, path: &str) -> Result<&'a Entry, JcfError> {
        let key = PathKey::parse(path)?;
        match self.resolve(&key)?.target {
            Target::Entry(entry) => Ok(entry),
            Target::Element(_) => Err(wrong_type(&key.to_string(), EntryKind::Scalar, EntryKind::Block)),
        }
    }

    /// Scalar at `path` with `$name$` references expanded.
    pub fn get_scalar(&self, path: &str) -> Result<String, JcfError> {
        self.get_scalar_within(path, 0, &mut Expansion::default())
    }

    pub(crate) fn get_scalar_within(
        &self,
        path: &str,
        depth: usize,
        expansion: &mut Expansion,
    ) -> Result<String, JcfError> {
        let key = PathKey::parse(path)?;
        let resolved = self.resolve(&key)?;
        match resolved.target {
            Target::Entry(Entry::Scalar(raw)) => interpolate::translate_within(&resolved.holder, raw, depth, expansion),
            Target::Entry(other) => Err(wrong_type(&key.to_string(), EntryKind::Scalar, other.kind())),
            Target::Element(_) => Err(wrong_type(&key.to_string(), EntryKind::Scalar, EntryKind::Block)),
        }
    }

    /// Scalar at `path` exactly as stored.
    pub fn get_raw(&self, path: &str) -> Result<&'a str, JcfError> {
        match self.get(path)? {
            Entry::Scalar(raw) => Ok(raw.as_str()),
            other => Err(wrong_type(path.trim(), EntryKind::Scalar, other.kind())),
        }
    }

    /// Block at `path`. The empty path is this node.
    pub fn get_child(&self, path: &str) -> Result<NodeRef<'a>, JcfError> {
        let key = PathKey::parse(path)?;
        if key.is_empty() {
            return Ok(self.clone());
        }
        let resolved = self.resolve(&key)?;
        match resolved.target {
            Target::Element(node) | Target::Entry(Entry::Block(node)) => Ok(resolved.holder.child(node)),
            Target::Entry(other) => Err(wrong_type(&key.to_string(), EntryKind::Block, other.kind())),
        }
    }

    pub fn get_list(&self, path: &str) -> Result<Vec<NodeRef<'a>>, JcfError> {
        let key = PathKey::parse(path)?;
        let resolved = self.resolve(&key)?;
        match resolved.target {
            Target::Entry(Entry::List(items)) => {
                Ok(items.iter().map(|item| resolved.holder.child(item)).collect())
            }
            Target::Entry(other) => Err(wrong_type(&key.to_string(), EntryKind::List, other.kind())),
            Target::Element(_) => Err(wrong_type(&key.to_string(), EntryKind::List, EntryKind::Block)),
        }
    }

    /// Everything in this block with scalars interpolated, for callers that
    /// want a flat snapshot of one level.
    pub fn resolved_values(&self) -> Result<Vec<(&'a str, String)>, JcfError> {
        self.node
            .values()
            .map(|(k, raw)| interpolate::translate(self, raw).map(|v| (k, v)))
            .collect()
    }
}

fn wrong_type(path: &str, expected: EntryKind, found: EntryKind) -> JcfError {
    JcfError::WrongType {
        path: path.to_string(),
        expected,
        found,
        hint: None,
        code: Some(405),
    }
}

fn prefix(err: JcfError, walked: &[Segment]) -> JcfError {
    walked
        .iter()
        .rev()
        .fold(err, |err, seg| err.within(&seg.to_string()))
}

impl Node {
    /// Scope with this node as the root.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::root(self)
    }

    pub fn get(&self, path: &str) -> Result<&Entry, JcfError> {
        self.root().get(path)
    }

    pub fn get_scalar(&self, path: &str) -> Result<String, JcfError> {
        self.root().get_scalar(path)
    }

    pub fn get_raw(&self, path: &str) -> Result<&str, JcfError> {
        self.root().get_raw(path)
    }

    pub fn get_child(&self, path: &str) -> Result<NodeRef<'_>, JcfError> {
        self.root().get_child(path)
    }

    pub fn get_list(&self, path: &str) -> Result<Vec<NodeRef<'_>>, JcfError> {
        self.root().get_list(path)
    }

    /// Replace the entry at an existing `path` with one of the same category.
    pub fn set(&mut self, path: &str, entry: Entry) -> Result<(), JcfError> {
        let key = PathKey::parse(path)?;
        let Some((last, parents)) = key.split_last() else {
            return Err(JcfError::InvalidPath {
                path: path.to_string(),
                message: "Empty path".into(),
                hint: None,
                code: Some(404),
            });
        };

        serializer::check_entry(&entry, &key.to_string())?;

        let holder = self.walk_mut(parents)?;
        if let Some(index) = last.index {
            let element = holder.element_mut(last, index).map_err(|e| prefix(e, parents))?;
            return match entry {
                Entry::Block(node) => {
                    *element = node;
                    Ok(())
                }
                other => Err(wrong_type(&key.to_string(), EntryKind::Block, other.kind())),
            };
        }

        let slot = holder.entry_mut(&last.name).ok_or_else(|| {
            prefix(
                JcfError::UnknownKey {
                    path: last.name.clone(),
                    segment: last.name.clone(),
                    hint: Some("`set` only replaces existing keys; use `override_value` to create them".into()),
                    code: Some(401),
                },
                parents,
            )
        })?;
        if slot.kind() != entry.kind() {
            return Err(wrong_type(&key.to_string(), slot.kind(), entry.kind()));
        }
        *slot = entry;
        Ok(())
    }

    /// Set a scalar at `path`, creating missing intermediate blocks.
    ///
    /// Indexed segments must already exist; list elements are never created.
    pub fn override_value(&mut self, path: &str, value: impl Into<String>) -> Result<(), JcfError> {
        let key = PathKey::parse(path)?;
        let Some((last, parents)) = key.split_last() else {
            return Err(JcfError::InvalidPath {
                path: path.to_string(),
                message: "Empty path".into(),
                hint: None,
                code: Some(404),
            });
        };
        if last.index.is_some() {
            return Err(JcfError::InvalidPath {
                path: key.to_string(),
                message: "Cannot store a scalar at a list index".into(),
                hint: Some("Address a key inside the element: `list#0.key`".into()),
                code: Some(406),
            });
        }

        let value: String = value.into();
        let value = value.trim();
        if let Some(reason) = unwritable_scalar(value) {
            return Err(JcfError::InvalidValue {
                path: key.to_string(),
                message: format!("Cannot store '{}': {}", value.escape_debug(), reason),
                hint: Some("Scalars are one line without '{', '}', '[' or ']'".into()),
                code: Some(409),
            });
        }

        let mut current = self;
        for (i, seg) in parents.iter().enumerate() {
            current = match seg.index {
                Some(index) => current.element_mut(seg, index),
                None => current.block_or_create(&seg.name),
            }
            .map_err(|e| prefix(e, &parents[..i]))?;
        }

        current.set_value(last.name.clone(), value);
        Ok(())
    }

    fn walk_mut(&mut self, segments: &[Segment]) -> Result<&mut Node, JcfError> {
        let mut current = self;
        for (i, seg) in segments.iter().enumerate() {
            current = match seg.index {
                Some(index) => current.element_mut(seg, index),
                None => match current.entry_mut(&seg.name) {
                    Some(Entry::Block(node)) => Ok(node),
                    Some(other) => Err(wrong_type(&seg.name, EntryKind::Block, other.kind())),
                    None => Err(JcfError::UnknownKey {
                        path: seg.name.clone(),
                        segment: seg.name.clone(),
                        hint: None,
                        code: Some(401),
                    }),
                },
            }
            .map_err(|e| prefix(e, &segments[..i]))?;
        }
        Ok(current)
    }

    fn element_mut(&mut self, seg: &Segment, index: usize) -> Result<&mut Node, JcfError> {
        match self.entry_mut(&seg.name) {
            Some(Entry::List(items)) => {
                let len = items.len();
                items.get_mut(index).ok_or_else(|| JcfError::UnknownKey {
                    path: seg.to_string(),
                    segment: seg.to_string(),
                    hint: Some(format!("List '{}' has {} element(s)", seg.name, len)),
                    code: Some(402),
                })
            }
            Some(other) => Err(wrong_type(&seg.to_string(), EntryKind::List, other.kind())),
            None => Err(JcfError::UnknownKey {
                path: seg.to_string(),
                segment: seg.name.clone(),
                hint: None,
                code: Some(401),
            }),
        }
    }

    fn block_or_create(&mut self, name: &str) -> Result<&mut Node, JcfError> {
        match self.entry_or_insert_with(name, || Entry::Block(Node::new())) {
            Entry::Block(node) => Ok(node),
            other => Err(wrong_type(name, EntryKind::Block, other.kind())),
        }
    }
}
