//! Property-based invariant tests for the hierarchy, visibility and layout.
//!
//! 1. A source of N records builds exactly N nodes with ids `0..N` in pre-order.
//! 2. Visible and hidden children always partition the original child list.
//! 3. Toggling a leaf has no observable effect.
//! 4. Adjacent nodes in one column are at least one row apart.
//! 5. Column coordinate is constant per depth and strictly increasing with it.
//! 6. Only nodes reachable through visible edges are laid out as visible.

use arbor_layout::{ExpansionPolicy, LayoutConfig, NodeId, SourceRecord, TidyLayout, Tree, TreeNode};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Random tree shape as a parent list: node `i > 0` hangs under `parents[i - 1] < i`.
fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    (1usize..60).prop_flat_map(|n| (1..n).map(|i| 0..i).collect::<Vec<_>>())
}

fn record_from_shape(parents: &[usize]) -> SourceRecord {
    fn grow(index: usize, kids: &[Vec<usize>]) -> SourceRecord {
        let mut record = SourceRecord::new(format!("n{index}"));
        for &k in &kids[index] {
            record = record.child(grow(k, kids));
        }
        record
    }
    let mut kids = vec![Vec::new(); parents.len() + 1];
    for (i, &p) in parents.iter().enumerate() {
        kids[p].push(i + 1);
    }
    grow(0, &kids)
}

fn preorder_labels(record: &SourceRecord, out: &mut Vec<String>) {
    out.push(record.name.clone());
    for child in record.children() {
        preorder_labels(child, out);
    }
}

fn assert_partition(tree: &Tree, snapshot: &[Vec<NodeId>]) -> Result<(), TestCaseError> {
    for node in tree.preorder() {
        let visible = node.visible_children();
        let hidden = node.hidden_children();
        prop_assert!(visible.is_empty() || hidden.is_empty());
        prop_assert_eq!(node.original_children(), snapshot[node.id().index()].as_slice());
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Ids are dense and pre-order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ids_dense_and_preorder(parents in shape_strategy()) {
        let source = record_from_shape(&parents);
        let tree = Tree::build(&source, &ExpansionPolicy::RootOnly).unwrap();

        prop_assert_eq!(tree.len(), parents.len() + 1);
        let mut expected = Vec::new();
        preorder_labels(&source, &mut expected);
        for (i, node) in tree.preorder().enumerate() {
            prop_assert_eq!(node.id().index(), i);
            prop_assert_eq!(node.label(), expected[i].as_str());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Partition survives any toggle sequence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn partition_survives_toggles(
        parents in shape_strategy(),
        toggles in prop::collection::vec(0usize..60, 0..40),
    ) {
        let source = record_from_shape(&parents);
        let mut tree = Tree::build(&source, &ExpansionPolicy::All).unwrap();
        let snapshot: Vec<Vec<NodeId>> = tree
            .preorder()
            .map(|n| n.original_children().to_vec())
            .collect();

        for t in toggles {
            let id = NodeId::new(t % tree.len());
            tree.toggle(id).unwrap();
            assert_partition(&tree, &snapshot)?;
        }
        tree.collapse_all();
        assert_partition(&tree, &snapshot)?;
        tree.expand_all();
        assert_partition(&tree, &snapshot)?;
        prop_assert_eq!(tree.visible().count(), tree.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Leaf toggles are idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn leaf_toggle_is_noop(parents in shape_strategy()) {
        let source = record_from_shape(&parents);
        let mut tree = Tree::build(&source, &ExpansionPolicy::All).unwrap();
        let before: Vec<NodeId> = tree.visible().map(TreeNode::id).collect();
        let leaves: Vec<NodeId> = tree
            .preorder()
            .filter(|n| !n.is_expandable())
            .map(TreeNode::id)
            .collect();
        for leaf in leaves {
            prop_assert!(!tree.toggle(leaf).unwrap().changed());
        }
        let after: Vec<NodeId> = tree.visible().map(TreeNode::id).collect();
        prop_assert_eq!(before, after);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4–6. Layout geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_rows_and_columns(
        parents in shape_strategy(),
        toggles in prop::collection::vec(0usize..60, 0..8),
        row_height in 4.0f64..40.0,
    ) {
        let source = record_from_shape(&parents);
        let mut tree = Tree::build(&source, &ExpansionPolicy::All).unwrap();
        for t in toggles {
            let id = NodeId::new(t % tree.len());
            tree.toggle(id).unwrap();
        }

        let config = LayoutConfig::default().with_row_height(row_height);
        let engine = TidyLayout::for_width(config, 600.0, &tree);
        let summary = engine.run(&mut tree).unwrap();
        prop_assert_eq!(summary.visible, tree.visible().count());
        prop_assert_eq!(tree.node(tree.root()).unwrap().x(), 0.0);

        let spacing = engine.column_spacing();
        prop_assert!(spacing > 0.0);
        for depth in 0..=tree.height() {
            let column: Vec<&TreeNode> = tree.visible().filter(|n| n.depth() == depth).collect();
            for node in &column {
                prop_assert_eq!(node.y(), depth as f64 * spacing);
                prop_assert!(summary.extent.min <= node.x() && node.x() <= summary.extent.max);
            }
            let mut xs: Vec<f64> = column.iter().map(|n| n.x()).collect();
            xs.sort_by(f64::total_cmp);
            for pair in xs.windows(2) {
                prop_assert!(
                    pair[1] - pair[0] >= row_height - 1e-6,
                    "depth {} too tight: {:?}", depth, xs
                );
            }
        }

        for node in tree.preorder() {
            let reachable = tree.is_visible(node.id());
            let listed = tree.visible().any(|v| v.id() == node.id());
            prop_assert_eq!(reachable, listed);
        }
    }
}
