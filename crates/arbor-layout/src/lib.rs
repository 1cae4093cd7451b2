#![forbid(unsafe_code)]

//! Hierarchy arena, expand/collapse state and tidy tree layout.
//!
//! A [`Tree`] is built once from a [`HierarchySource`], mutated by the
//! visibility operations in [`visibility`] and positioned by [`TidyLayout`].
//! None of it knows about rendering or animation.

pub mod hierarchy;
pub mod tidy;
pub mod visibility;

pub use hierarchy::{FlatHierarchy, HierarchySource, NodeId, SourceRecord, Tree, TreeNode};
pub use tidy::{LayoutConfig, LayoutSummary, TidyLayout};
pub use visibility::{Expansion, ExpansionPolicy, ToggleOutcome};
