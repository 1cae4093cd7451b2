#![forbid(unsafe_code)]

//! Expand/collapse state.
//!
//! Every node with children is either [`Expansion::Expanded`] (its whole
//! original child list is in `visible_children`) or [`Expansion::Collapsed`]
//! (the whole list is in `hidden_children`). The operations here only ever
//! move the list wholesale between the two, so the partition invariant holds
//! by construction and source order is never disturbed.

use std::collections::BTreeSet;

use arbor_core::error::Result;

use crate::hierarchy::{NodeId, Tree, TreeNode};

/// Per-node visibility state. Leaves have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expansion {
    Collapsed,
    Expanded,
}

/// Which nodes start expanded when a tree is built.
///
/// The root is always expanded regardless of the policy.
#[derive(Debug, Clone, Default)]
pub enum ExpansionPolicy {
    /// Only the root.
    #[default]
    RootOnly,
    /// Every node.
    All,
    /// Nodes shallower than the given depth (`ToDepth(1)` is `RootOnly`).
    ToDepth(usize),
    /// Nodes whose label is exactly this many characters long.
    LabelLength(usize),
    /// An explicit set of node ids.
    Ids(BTreeSet<NodeId>),
    /// Arbitrary predicate.
    Custom(fn(&TreeNode) -> bool),
}

impl ExpansionPolicy {
    /// Whether the policy selects `node` to start expanded.
    #[must_use]
    pub fn selects(&self, node: &TreeNode) -> bool {
        if node.parent().is_none() {
            return true;
        }
        match self {
            Self::RootOnly => false,
            Self::All => true,
            Self::ToDepth(depth) => node.depth() < *depth,
            Self::LabelLength(len) => node.label().chars().count() == *len,
            Self::Ids(ids) => ids.contains(&node.id()),
            Self::Custom(predicate) => predicate(node),
        }
    }
}

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Hidden children became visible.
    Expanded,
    /// Visible children were hidden.
    Collapsed,
    /// The node is a leaf; nothing changed.
    Ignored,
}

impl ToggleOutcome {
    /// Whether the visible set changed.
    #[must_use]
    pub fn changed(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl Tree {
    /// Reset every node to the state `policy` prescribes.
    pub fn apply_policy(&mut self, policy: &ExpansionPolicy) {
        for index in 0..self.len() {
            let open = self
                .get(NodeId::new(index))
                .is_some_and(|node| policy.selects(node));
            let node = &mut self.nodes_mut()[index];
            if open {
                if node.visible_children.is_empty() && !node.hidden_children.is_empty() {
                    node.visible_children = std::mem::take(&mut node.hidden_children);
                }
            } else if !node.visible_children.is_empty() {
                node.hidden_children = std::mem::take(&mut node.visible_children);
            }
        }
        arbor_core::debug!(
            policy = ?policy,
            expanded = self.preorder().filter(|n| !n.visible_children().is_empty()).count(),
            "initial expansion applied"
        );
    }

    /// Expansion state of a node; `None` for leaves and unknown ids.
    #[must_use]
    pub fn state(&self, id: NodeId) -> Option<Expansion> {
        self.get(id).and_then(TreeNode::expansion)
    }

    /// Whether the node has any original children.
    #[must_use]
    pub fn is_expandable(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(TreeNode::is_expandable)
    }

    /// Flip a node between expanded and collapsed. Leaves are a no-op.
    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleOutcome> {
        let outcome = match self.node(id)?.expansion() {
            None => ToggleOutcome::Ignored,
            Some(Expansion::Expanded) => {
                self.collapse(id)?;
                ToggleOutcome::Collapsed
            }
            Some(Expansion::Collapsed) => {
                self.expand(id)?;
                ToggleOutcome::Expanded
            }
        };
        arbor_core::debug!(node = id.index(), outcome = ?outcome, "toggle");
        Ok(outcome)
    }

    /// Show a node's children. Returns whether anything changed.
    pub fn expand(&mut self, id: NodeId) -> Result<bool> {
        let node = self.node_mut(id)?;
        if node.hidden_children.is_empty() {
            return Ok(false);
        }
        node.visible_children = std::mem::take(&mut node.hidden_children);
        Ok(true)
    }

    /// Hide a node's children. Returns whether anything changed.
    pub fn collapse(&mut self, id: NodeId) -> Result<bool> {
        let node = self.node_mut(id)?;
        if node.visible_children.is_empty() {
            return Ok(false);
        }
        node.hidden_children = std::mem::take(&mut node.visible_children);
        Ok(true)
    }

    /// Expand every node.
    pub fn expand_all(&mut self) -> bool {
        let mut changed = false;
        for node in self.nodes_mut() {
            if !node.hidden_children.is_empty() {
                node.visible_children = std::mem::take(&mut node.hidden_children);
                changed = true;
            }
        }
        changed
    }

    /// Collapse every node except the root.
    pub fn collapse_all(&mut self) -> bool {
        let mut changed = false;
        for node in self.nodes_mut() {
            let keep_open = node.parent().is_none();
            if keep_open {
                if !node.hidden_children.is_empty() {
                    node.visible_children = std::mem::take(&mut node.hidden_children);
                    changed = true;
                }
            } else if !node.visible_children.is_empty() {
                node.hidden_children = std::mem::take(&mut node.visible_children);
                changed = true;
            }
        }
        changed
    }
}
