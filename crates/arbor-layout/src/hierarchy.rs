#![forbid(unsafe_code)]

//! Hierarchy builder.
//!
//! Converts a hierarchical source into a [`Tree`]: a single arena of
//! [`TreeNode`]s addressed by [`NodeId`]. Ids are assigned once, in pre-order,
//! starting at 0, and never change. Parent links are plain ids into the same
//! arena, so the tree has exactly one owner and is dropped as a whole.
//!
//! # Example
//!
//! ```
//! use arbor_layout::hierarchy::{SourceRecord, Tree};
//! use arbor_layout::visibility::ExpansionPolicy;
//!
//! let source = SourceRecord::new("a")
//!     .child(SourceRecord::new("b"))
//!     .child(SourceRecord::new("c").child(SourceRecord::new("d")));
//!
//! let tree = Tree::build(&source, &ExpansionPolicy::RootOnly).unwrap();
//! assert_eq!(tree.len(), 4);
//! assert_eq!(tree.label(tree.root()), "a");
//! assert_eq!(tree.visible().count(), 3);
//! ```

use std::collections::HashSet;

use arbor_core::error::{ArborError, HierarchyFault, Result};
use arbor_core::geometry::Point;
use serde::{Deserialize, Serialize};

use crate::visibility::{Expansion, ExpansionPolicy};

// ---------------------------------------------------------------------------
// Source data
// ---------------------------------------------------------------------------

/// External input record: `{ "name": string, "children"?: [ ... ] }`.
///
/// Unknown fields are ignored. A missing or empty `children` list is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SourceRecord>>,
}

impl SourceRecord {
    /// Create a leaf record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
        }
    }

    /// Append a child record.
    #[must_use]
    pub fn child(mut self, record: SourceRecord) -> Self {
        self.children.get_or_insert_with(Vec::new).push(record);
        self
    }

    /// Replace the child list.
    #[must_use]
    pub fn with_children(mut self, records: Vec<SourceRecord>) -> Self {
        self.children = Some(records);
        self
    }

    /// Child records, empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[SourceRecord] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Total number of records in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(record) = stack.pop() {
            count += 1;
            stack.extend(record.children());
        }
        count
    }

    /// Parse a record tree from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(invalid_source)
    }

    /// Parse a record tree from JSON bytes.
    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(invalid_source)
    }
}

fn invalid_source(err: serde_json::Error) -> ArborError {
    ArborError::InvalidSource {
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
    }
}

/// Anything that can be walked as a hierarchy.
///
/// `identity` must return the same value every time the same underlying node
/// is reached; the builder uses it to detect cycles and shared nodes.
pub trait HierarchySource {
    /// Cheap handle to one node of the source.
    type Handle<'a>: Copy
    where
        Self: 'a;

    /// The root node.
    fn root(&self) -> Self::Handle<'_>;

    /// Display label of a node.
    fn label<'a>(&'a self, node: Self::Handle<'a>) -> &'a str;

    /// Ordered children of a node.
    fn children<'a>(&'a self, node: Self::Handle<'a>) -> Vec<Self::Handle<'a>>;

    /// Identity used for revisit detection.
    fn identity<'a>(&'a self, node: Self::Handle<'a>) -> usize;
}

impl HierarchySource for SourceRecord {
    type Handle<'a> = &'a SourceRecord;

    fn root(&self) -> &SourceRecord {
        self
    }

    fn label<'a>(&'a self, node: &'a SourceRecord) -> &'a str {
        &node.name
    }

    fn children<'a>(&'a self, node: &'a SourceRecord) -> Vec<&'a SourceRecord> {
        node.children().iter().collect()
    }

    fn identity<'a>(&'a self, node: &'a SourceRecord) -> usize {
        std::ptr::from_ref(node) as usize
    }
}

/// Adjacency-list hierarchy addressed by index.
///
/// Unlike [`SourceRecord`], this shape can describe cycles and nodes with
/// several parents; [`Tree::build`] rejects both.
#[derive(Debug, Clone, Default)]
pub struct FlatHierarchy {
    labels: Vec<String>,
    children: Vec<Vec<usize>>,
    root: usize,
}

impl FlatHierarchy {
    /// Create an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        self.labels.push(label.into());
        self.children.push(Vec::new());
        self.labels.len() - 1
    }

    /// Append `child` to `parent`'s child list.
    pub fn add_child(&mut self, parent: usize, child: usize) -> Result<()> {
        if child >= self.labels.len() {
            return Err(ArborError::UnknownNode(child));
        }
        self.children
            .get_mut(parent)
            .ok_or(ArborError::UnknownNode(parent))?
            .push(child);
        Ok(())
    }

    /// Choose the root node (defaults to index 0).
    pub fn set_root(&mut self, root: usize) -> Result<()> {
        if root >= self.labels.len() {
            return Err(ArborError::UnknownNode(root));
        }
        self.root = root;
        Ok(())
    }

    /// Number of nodes added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no nodes were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl HierarchySource for FlatHierarchy {
    type Handle<'a> = usize;

    fn root(&self) -> usize {
        self.root
    }

    fn label<'a>(&'a self, node: usize) -> &'a str {
        self.labels.get(node).map_or("", String::as_str)
    }

    fn children<'a>(&'a self, node: usize) -> Vec<usize> {
        self.children.get(node).cloned().unwrap_or_default()
    }

    fn identity<'a>(&'a self, node: usize) -> usize {
        node
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Stable node identifier: the node's pre-order index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root is always id 0.
    pub const ROOT: Self = Self(0);

    /// Id from a raw pre-order index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw pre-order index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One node of a [`Tree`].
#[derive(Debug, Clone)]
pub struct TreeNode {
    id: NodeId,
    label: String,
    parent: Option<NodeId>,
    depth: usize,
    pub(crate) visible_children: Vec<NodeId>,
    pub(crate) hidden_children: Vec<NodeId>,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) prev_x: f64,
    pub(crate) prev_y: f64,
}

impl TreeNode {
    /// Stable id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Label copied from the source.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parent id, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Depth, root = 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Children currently shown.
    #[must_use]
    pub fn visible_children(&self) -> &[NodeId] {
        &self.visible_children
    }

    /// Children currently collapsed away.
    #[must_use]
    pub fn hidden_children(&self) -> &[NodeId] {
        &self.hidden_children
    }

    /// The node's full original child list, in source order.
    #[must_use]
    pub fn original_children(&self) -> &[NodeId] {
        if self.visible_children.is_empty() {
            &self.hidden_children
        } else {
            &self.visible_children
        }
    }

    /// Whether the node had any children in the source.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        !self.visible_children.is_empty() || !self.hidden_children.is_empty()
    }

    /// Expansion state; `None` for leaves, which have no toggle affordance.
    #[must_use]
    pub fn expansion(&self) -> Option<Expansion> {
        if !self.visible_children.is_empty() {
            Some(Expansion::Expanded)
        } else if !self.hidden_children.is_empty() {
            Some(Expansion::Collapsed)
        } else {
            None
        }
    }

    /// Row coordinate (perpendicular to tree growth) from the last layout pass.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Column coordinate (along tree growth) from the last layout pass.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Row coordinate captured after the previous pass.
    #[must_use]
    pub fn prev_x(&self) -> f64 {
        self.prev_x
    }

    /// Column coordinate captured after the previous pass.
    #[must_use]
    pub fn prev_y(&self) -> f64 {
        self.prev_y
    }

    /// Current position in scene space: the tree grows left to right, so the
    /// column becomes the horizontal axis.
    #[must_use]
    pub fn scene_position(&self) -> Point {
        Point::new(self.y, self.x)
    }

    /// Previous-pass position in scene space.
    #[must_use]
    pub fn prev_scene_position(&self) -> Point {
        Point::new(self.prev_y, self.prev_x)
    }
}

/// Arena holding every node of one hierarchy.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    height: usize,
}

impl Tree {
    /// Build a tree from `source` and apply the initial expansion `policy`.
    ///
    /// Every node starts collapsed; the policy then expands the root and any
    /// node it selects.
    ///
    /// # Errors
    ///
    /// [`ArborError::MalformedHierarchy`] if any node is reached twice.
    pub fn build<S: HierarchySource + ?Sized>(source: &S, policy: &ExpansionPolicy) -> Result<Self> {
        let mut tree = Self::from_source(source)?;
        tree.apply_policy(policy);

        arbor_core::debug!(
            nodes = tree.len(),
            height = tree.height,
            visible = tree.visible().count(),
            "hierarchy built"
        );
        Ok(tree)
    }

    fn from_source<S: HierarchySource + ?Sized>(source: &S) -> Result<Self> {
        let root = source.root();
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut identities: Vec<usize> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();
        let mut height = 0;

        seen.insert(source.identity(root));
        let mut stack = vec![(root, None::<NodeId>, 0usize)];

        while let Some((handle, parent, depth)) = stack.pop() {
            let id = NodeId(nodes.len());
            nodes.push(TreeNode {
                id,
                label: source.label(handle).to_owned(),
                parent,
                depth,
                visible_children: Vec::new(),
                hidden_children: Vec::new(),
                x: 0.0,
                y: 0.0,
                prev_x: 0.0,
                prev_y: 0.0,
            });
            identities.push(source.identity(handle));
            if let Some(p) = parent {
                nodes[p.0].hidden_children.push(id);
            }
            height = height.max(depth);

            let children = source.children(handle);
            for &child in &children {
                let identity = source.identity(child);
                if !seen.insert(identity) {
                    let reason = if is_on_path(&nodes, &identities, id, identity) {
                        HierarchyFault::Cycle
                    } else {
                        HierarchyFault::SharedNode
                    };
                    let node = source.label(child).to_owned();
                    arbor_core::warn!(node = %node, %reason, "rejecting malformed hierarchy");
                    return Err(ArborError::MalformedHierarchy { node, reason });
                }
            }
            // Reverse push so children pop in source order.
            for child in children.into_iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        Ok(Self { nodes, height })
    }

    /// Number of nodes in the whole hierarchy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Height of the full hierarchy (max depth), independent of visibility.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node, failing with [`ArborError::UnknownNode`].
    pub fn node(&self, id: NodeId) -> Result<&TreeNode> {
        self.get(id).ok_or(ArborError::UnknownNode(id.0))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode> {
        self.nodes.get_mut(id.0).ok_or(ArborError::UnknownNode(id.0))
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [TreeNode] {
        &mut self.nodes
    }

    /// Label of a node (empty for unknown ids).
    #[must_use]
    pub fn label(&self, id: NodeId) -> &str {
        self.get(id).map_or("", TreeNode::label)
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TreeNode::parent)
    }

    /// Depth of a node (0 for unknown ids).
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, TreeNode::depth)
    }

    /// Full original child list of a node, in source order.
    #[must_use]
    pub fn original_children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], TreeNode::original_children)
    }

    /// Visible children of a node (empty for unknown ids).
    #[must_use]
    pub fn visible_children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], TreeNode::visible_children)
    }

    /// Whether the node is reachable from the root through visible edges.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(mut node) = self.get(id) else {
            return false;
        };
        while let Some(parent) = node.parent {
            let p = &self.nodes[parent.0];
            if !p.visible_children.contains(&node.id) {
                return false;
            }
            node = p;
        }
        true
    }

    /// Every node in pre-order (id order).
    pub fn preorder(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter()
    }

    /// Visible nodes in pre-order.
    pub fn visible(&self) -> Visible<'_> {
        Visible {
            tree: self,
            stack: if self.nodes.is_empty() {
                Vec::new()
            } else {
                vec![NodeId::ROOT]
            },
        }
    }
}

/// Pre-order iterator over the visible closure of the root.
#[derive(Debug, Clone)]
pub struct Visible<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Visible<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        self.stack.extend(node.visible_children.iter().rev());
        Some(node)
    }
}

/// Whether `identity` belongs to `from` or one of its ancestors.
fn is_on_path(nodes: &[TreeNode], identities: &[usize], from: NodeId, identity: usize) -> bool {
    let mut cursor = Some(from);
    while let Some(id) = cursor {
        if identities[id.0] == identity {
            return true;
        }
        cursor = nodes[id.0].parent;
    }
    false
}
