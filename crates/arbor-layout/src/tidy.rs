#![forbid(unsafe_code)]

//! Fixed-node-size tidy tree layout.
//!
//! Buchheim, Jünger and Leipert's linear-time refinement of the Walker
//! algorithm. Only the visible closure of the root takes part; nodes under a
//! collapsed ancestor keep whatever position they had last.
//!
//! # Coordinates
//!
//! - Row `x` (perpendicular to growth) is measured in row units during the
//!   walks and multiplied by [`LayoutConfig::row_height`] at the end. The root
//!   always lands on `x = 0`.
//! - Column `y` is `depth * column_spacing`. The spacing is fixed when the
//!   layout is created from the height of the *full* hierarchy, so columns do
//!   not shift as subtrees open and close.
//!
//! # Invariants
//!
//! 1. Adjacent nodes in the same column are at least one row apart.
//! 2. A parent sits at the midpoint of its first and last visible child.
//! 3. Every pass is iterative; tree depth is bounded only by memory.

use arbor_core::error::{ArborError, Result};
use arbor_core::geometry::Extent;

use crate::hierarchy::{NodeId, Tree};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Distance between adjacent rows, in scene units.
    pub row_height: f64,
    /// Gap between siblings, in rows.
    pub sibling_separation: f64,
    /// Gap between neighbours with different parents, in rows.
    pub cousin_separation: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }
}

impl LayoutConfig {
    /// Set the row height.
    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the sibling and cousin separations (in rows).
    #[must_use]
    pub fn with_separation(mut self, sibling: f64, cousin: f64) -> Self {
        self.sibling_separation = sibling;
        self.cousin_separation = cousin;
        self
    }
}

/// What a layout pass reports back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSummary {
    /// Row range covered by visible nodes.
    pub extent: Extent,
    /// First visible node (pre-order) with the smallest row coordinate.
    pub left: NodeId,
    /// First visible node (pre-order) with the largest row coordinate.
    pub right: NodeId,
    /// Number of visible nodes positioned.
    pub visible: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Tidy tree layout with a fixed column spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TidyLayout {
    config: LayoutConfig,
    column_spacing: f64,
}

impl TidyLayout {
    /// Layout with an explicit column spacing.
    #[must_use]
    pub fn new(config: LayoutConfig, column_spacing: f64) -> Self {
        Self {
            config,
            column_spacing,
        }
    }

    /// Spread the full hierarchy's columns over `available_width`, which must
    /// be positive for columns to advance with depth.
    #[must_use]
    pub fn for_width(config: LayoutConfig, available_width: f64, tree: &Tree) -> Self {
        let columns = (tree.height() + 1) as f64;
        Self::new(config, available_width / columns)
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Distance between adjacent columns.
    #[must_use]
    pub fn column_spacing(&self) -> f64 {
        self.column_spacing
    }

    /// Position every visible node of `tree`.
    ///
    /// # Errors
    ///
    /// [`ArborError::EmptyLayout`] if nothing is visible, which only happens
    /// for an empty arena.
    pub fn run(&self, tree: &mut Tree) -> Result<LayoutSummary> {
        let mut walk = Walk::collect(tree);
        if walk.nodes.is_empty() {
            arbor_core::error!("layout produced no visible nodes");
            return Err(ArborError::EmptyLayout);
        }

        let span = arbor_core::debug_span!("tidy_layout", visible = walk.nodes.len());
        let _guard = span.enter();

        walk.first_walk(&self.config);
        walk.second_walk();

        let nodes = tree.nodes_mut();
        let mut summary: Option<LayoutSummary> = None;
        for w in &walk.nodes {
            let node = &mut nodes[w.id.index()];
            node.x = w.x * self.config.row_height;
            node.y = node.depth() as f64 * self.column_spacing;

            let x = node.x;
            let id = node.id();
            match summary.as_mut() {
                None => {
                    summary = Some(LayoutSummary {
                        extent: Extent::point(x),
                        left: id,
                        right: id,
                        visible: 1,
                    });
                }
                Some(s) => {
                    if x < s.extent.min {
                        s.left = id;
                    }
                    if x > s.extent.max {
                        s.right = id;
                    }
                    s.extent.include(x);
                    s.visible += 1;
                }
            }
        }

        let summary = summary.ok_or(ArborError::EmptyLayout)?;
        arbor_core::debug!(
            visible = summary.visible,
            min = summary.extent.min,
            max = summary.extent.max,
            "layout pass"
        );
        Ok(summary)
    }
}

impl Tree {
    /// Record the current position of every visible node as its previous
    /// position, ready to anchor the next transition.
    pub fn stash_positions(&mut self) {
        let visible: Vec<NodeId> = self.visible().map(|n| n.id()).collect();
        let nodes = self.nodes_mut();
        for id in visible {
            let node = &mut nodes[id.index()];
            node.prev_x = node.x;
            node.prev_y = node.y;
        }
    }
}

// ---------------------------------------------------------------------------
// Buchheim walk
// ---------------------------------------------------------------------------

/// Scratch state for one visible node.
#[derive(Debug, Clone)]
struct WalkNode {
    id: NodeId,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Index among siblings.
    number: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor for this node's children during apportion.
    default_ancestor: Option<usize>,
    x: f64,
}

#[derive(Debug)]
struct Walk {
    /// Visible nodes in pre-order; index 0 is the root.
    nodes: Vec<WalkNode>,
}

impl Walk {
    fn collect(tree: &Tree) -> Self {
        let mut nodes: Vec<WalkNode> = Vec::new();
        let mut stack: Vec<(NodeId, Option<usize>, usize)> = Vec::new();
        if !tree.is_empty() {
            stack.push((tree.root(), None, 0));
        }

        while let Some((id, parent, number)) = stack.pop() {
            let index = nodes.len();
            nodes.push(WalkNode {
                id,
                parent,
                children: Vec::new(),
                number,
                prelim: 0.0,
                modifier: 0.0,
                change: 0.0,
                shift: 0.0,
                thread: None,
                ancestor: index,
                default_ancestor: None,
                x: 0.0,
            });
            if let Some(p) = parent {
                nodes[p].children.push(index);
            }
            let children = tree.visible_children(id);
            for (number, &child) in children.iter().enumerate().rev() {
                stack.push((child, Some(index), number));
            }
        }

        Self { nodes }
    }

    /// Children before parents, siblings left to right.
    fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.nodes[v].children.iter().copied());
        }
        order.reverse();
        order
    }

    fn separation(&self, config: &LayoutConfig, a: usize, b: usize) -> f64 {
        if self.nodes[a].parent == self.nodes[b].parent {
            config.sibling_separation
        } else {
            config.cousin_separation
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        let parent = node.parent?;
        node.number
            .checked_sub(1)
            .map(|i| self.nodes[parent].children[i])
    }

    fn first_walk(&mut self, config: &LayoutConfig) {
        for v in self.post_order() {
            let w = self.left_sibling(v);
            let children = &self.nodes[v].children;

            if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
                self.execute_shifts(v);
                let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
                if let Some(w) = w {
                    let prelim = self.nodes[w].prelim + self.separation(config, v, w);
                    self.nodes[v].prelim = prelim;
                    self.nodes[v].modifier = prelim - midpoint;
                } else {
                    self.nodes[v].prelim = midpoint;
                }
            } else if let Some(w) = w {
                self.nodes[v].prelim = self.nodes[w].prelim + self.separation(config, v, w);
            }

            if let Some(parent) = self.nodes[v].parent {
                let first_sibling = self.nodes[parent].children[0];
                let ancestor = self.nodes[parent].default_ancestor.unwrap_or(first_sibling);
                let ancestor = self.apportion(config, v, w, ancestor);
                self.nodes[parent].default_ancestor = Some(ancestor);
            }
        }
    }

    fn apportion(
        &mut self,
        config: &LayoutConfig,
        v: usize,
        w: Option<usize>,
        mut ancestor: usize,
    ) -> usize {
        let Some(w) = w else {
            return ancestor;
        };
        let Some(parent) = self.nodes[v].parent else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            // Outer contours are at least as deep as the inner ones.
            if let Some(om) = self.next_left(vom) {
                vom = om;
            }
            if let Some(op) = self.next_right(vop) {
                vop = op;
            }
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(config, vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if next_im.is_some() && self.next_right(vop).is_none() {
            self.nodes[vop].thread = next_im;
            self.nodes[vop].modifier += sim - sop;
        }
        if next_ip.is_some() && self.next_left(vom).is_none() {
            self.nodes[vom].thread = next_ip;
            self.nodes[vom].modifier += sip - som;
            ancestor = v;
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = (self.nodes[wp].number as f64 - self.nodes[wm].number as f64).max(1.0);
        let change = shift / subtrees;
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            let node = &mut self.nodes[w];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }

    /// Resolve modifiers top-down. The root is pinned to row 0.
    fn second_walk(&mut self) {
        let root_offset = -self.nodes[0].prelim;
        let mut stack = vec![(0usize, root_offset)];
        while let Some((v, parent_modifier)) = stack.pop() {
            let node = &mut self.nodes[v];
            node.x = node.prelim + parent_modifier;
            node.modifier += parent_modifier;
            let modifier = node.modifier;
            stack.extend(node.children.iter().map(|&c| (c, modifier)));
        }
    }
}
