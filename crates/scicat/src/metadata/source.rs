//! Hierarchical sources: the trait the extractor walks, and an in-memory tree.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Result, ScicatError};

use super::value::RawValue;

/// Kind of node found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Leaf,
}

/// Read-only access to a tree of groups and leaves addressed by
/// slash-delimited paths (`/` is the root group).
pub trait TreeSource {
    /// Kind of the node at `path`, or `None` when nothing lives there.
    fn node_kind(&self, path: &str) -> Option<NodeKind>;

    /// Child names of the group at `path`, in storage order.
    fn children(&self, path: &str) -> Result<Vec<String>>;

    /// Value of the leaf at `path`.
    fn read_value(&self, path: &str) -> Result<RawValue>;

    /// Attributes of the node at `path`, in storage order.
    ///
    /// The outer error means the attribute set could not be listed; each
    /// entry carries its own read result.
    fn read_attributes(&self, path: &str) -> Result<Vec<(String, Result<RawValue>)>>;
}

/// A node of an in-memory tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(Group),
    Leaf(Leaf),
}

/// Group node: named children kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    children: IndexMap<String, Node>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child group.
    pub fn with_group(mut self, name: impl Into<String>, group: Group) -> Self {
        self.children.insert(name.into(), Node::Group(group));
        self
    }

    /// Add a child leaf.
    pub fn with_leaf(mut self, name: impl Into<String>, leaf: Leaf) -> Self {
        self.children.insert(name.into(), Node::Leaf(leaf));
        self
    }

    /// Insert a leaf at a slash-delimited path below this group, creating
    /// intermediate groups on the way. An existing leaf in the way is
    /// replaced by a group.
    pub fn insert(&mut self, path: &str, leaf: Leaf) {
        let segments: Vec<&str> = split_path(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut group = self;
        for segment in parents {
            let entry = group
                .children
                .entry(segment.to_string())
                .or_insert_with(|| Node::Group(Group::new()));
            if !matches!(entry, Node::Group(_)) {
                *entry = Node::Group(Group::new());
            }
            let Node::Group(child) = entry else {
                return;
            };
            group = child;
        }
        group.children.insert(last.to_string(), Node::Leaf(leaf));
    }

    pub fn children(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn get(&self, path: &str) -> Option<&Node> {
        let mut segments = split_path(path);
        let first = segments.next()?;
        let mut node = self.children.get(first)?;
        for segment in segments {
            node = match node {
                Node::Group(g) => g.children.get(segment)?,
                Node::Leaf(_) => return None,
            };
        }
        Some(node)
    }
}

/// Leaf node: a value plus optional attributes.
///
/// The value, the attribute set or a single attribute can be marked
/// unreadable to model damaged files.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    value: Option<RawValue>,
    attributes: Option<IndexMap<String, Option<RawValue>>>,
}

impl Leaf {
    pub fn new(value: impl Into<RawValue>) -> Self {
        Self {
            value: Some(value.into()),
            attributes: Some(IndexMap::new()),
        }
    }

    /// Leaf whose value cannot be read.
    pub fn unreadable() -> Self {
        Self {
            value: None,
            attributes: Some(IndexMap::new()),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), Some(value.into()));
        self
    }

    /// Add an attribute whose value cannot be read.
    pub fn with_unreadable_attr(mut self, name: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), None);
        self
    }

    /// Make the attribute set of this leaf unreadable.
    pub fn with_unreadable_attributes(mut self) -> Self {
        self.attributes = None;
        self
    }

    pub fn value(&self) -> Option<&RawValue> {
        self.value.as_ref()
    }
}

/// A tree held in memory, used for fixtures and for sources that were
/// decoded up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTree {
    root: Group,
}

impl MemoryTree {
    pub fn new(root: Group) -> Self {
        Self { root }
    }

    /// Insert a leaf at an absolute path, creating groups as needed.
    pub fn insert(&mut self, path: &str, leaf: Leaf) -> &mut Self {
        self.root.insert(path, leaf);
        self
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    fn node(&self, path: &str) -> Option<&Node> {
        self.root.get(path)
    }
}

impl TreeSource for MemoryTree {
    fn node_kind(&self, path: &str) -> Option<NodeKind> {
        if is_root(path) {
            return Some(NodeKind::Group);
        }
        self.node(path).map(|node| match node {
            Node::Group(_) => NodeKind::Group,
            Node::Leaf(_) => NodeKind::Leaf,
        })
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        let group = if is_root(path) {
            &self.root
        } else {
            match self.node(path) {
                Some(Node::Group(g)) => g,
                _ => return Err(not_a_group(path)),
            }
        };
        Ok(group.children.keys().cloned().collect())
    }

    fn read_value(&self, path: &str) -> Result<RawValue> {
        match self.node(path) {
            Some(Node::Leaf(leaf)) => leaf.value.clone().ok_or_else(|| {
                ScicatError::LeafUnreadable {
                    path: path.to_string(),
                    message: "value cannot be read".to_string(),
                }
            }),
            Some(Node::Group(_)) => Err(ScicatError::LeafUnreadable {
                path: path.to_string(),
                message: "path is a group".to_string(),
            }),
            None => Err(ScicatError::LeafUnreadable {
                path: path.to_string(),
                message: "no such path".to_string(),
            }),
        }
    }

    fn read_attributes(&self, path: &str) -> Result<Vec<(String, Result<RawValue>)>> {
        match self.node(path) {
            Some(Node::Leaf(leaf)) => leaf
                .attributes
                .as_ref()
                .map(|attrs| {
                    attrs
                        .iter()
                        .map(|(name, value)| {
                            let read = value.clone().ok_or_else(|| ScicatError::LeafUnreadable {
                                path: format!("{}@{}", path, name),
                                message: "attribute cannot be read".to_string(),
                            });
                            (name.clone(), read)
                        })
                        .collect()
                })
                .ok_or_else(|| ScicatError::LeafUnreadable {
                    path: path.to_string(),
                    message: "attributes cannot be read".to_string(),
                }),
            Some(Node::Group(_)) => Ok(Vec::new()),
            None => Err(ScicatError::LeafUnreadable {
                path: path.to_string(),
                message: "no such path".to_string(),
            }),
        }
    }
}

/// Open a hierarchical file for reading.
///
/// Missing files are reported as [`ScicatError::SourceUnavailable`]. Files
/// that exist need the `hdf5` feature to be read.
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn TreeSource>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScicatError::SourceUnavailable {
            path: path.to_path_buf(),
            message: "file not found".to_string(),
        });
    }

    #[cfg(feature = "hdf5")]
    {
        let source = super::hdf5_source::Hdf5Source::open(path)?;
        Ok(Box::new(source))
    }

    #[cfg(not(feature = "hdf5"))]
    {
        Err(ScicatError::UnsupportedFormat(format!(
            "'{}': HDF5 support not enabled. Rebuild with --features hdf5",
            path.display()
        )))
    }
}

/// Join a parent path and a child name.
pub fn join_path(parent: &str, child: &str) -> String {
    if is_root(parent) {
        format!("/{}", child)
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}

/// Non-empty segments of a slash-delimited path.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn is_root(path: &str) -> bool {
    path.is_empty() || path.chars().all(|c| c == '/')
}

fn not_a_group(path: &str) -> ScicatError {
    ScicatError::InvalidInput(format!("'{}' is not a group", path))
}
