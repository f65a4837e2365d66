//! Structural checks shared by unit and fuzz tests.

use crate::{Alphabet, NodeIdx, SuffixTree};
use std::fmt::Debug;

/// Asserts every structural invariant of a tree, implicit or terminated:
/// single-parent reachability, edge-key agreement with the text, suffix
/// link labels, and — once terminated — the suffix/leaf correspondence and
/// node-count bounds.
pub(crate) fn check_invariants<A: Alphabet>(tree: &SuffixTree<A>)
where
    A::Symbol: Debug,
{
    let text = tree.text();
    let mut visited = vec![false; tree.node_count()];
    let mut leaves = Vec::new();
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        assert!(!visited[node.index()], "node {node:?} reached twice");
        visited[node.index()] = true;
        for (symbol, child) in tree.children(node) {
            let record = tree.node(child);
            assert_eq!(record.parent(), Some(node));
            assert_eq!(
                text[record.edge_start()], symbol,
                "edge key must equal the first label symbol"
            );
            stack.push((child, depth + tree.edge_label(child).len()));
        }
        if tree.node(node).is_leaf() {
            assert_eq!(tree.children(node).count(), 0);
            leaves.push((node, depth));
        }
    }
    assert!(
        visited.iter().all(|&seen| seen),
        "every node must be reachable from the root"
    );

    for (index, _) in tree.nodes() {
        if let Some(link) = tree.node(index).suffix_link() {
            let label = path_label(tree, index);
            let linked = path_label(tree, link);
            assert_eq!(
                &label[1..],
                linked.as_slice(),
                "suffix link of {index:?} must strip exactly the first symbol"
            );
        }
    }

    if !tree.is_terminated() {
        return;
    }
    if tree.is_empty() {
        // A terminated empty tree records the terminator without growing.
        assert!(leaves.is_empty());
        return;
    }

    // Terminated: the leaves are exactly the suffixes of the stored text.
    assert_eq!(leaves.len(), text.len());
    let mut starts = Vec::with_capacity(leaves.len());
    for &(leaf, depth) in &leaves {
        let start = tree.node(leaf).string_start().unwrap();
        assert_eq!(depth, text.len() - start);
        assert_eq!(path_label(tree, leaf).as_slice(), &text[start..]);
        starts.push(start);
    }
    starts.sort_unstable();
    assert_eq!(starts, (0..text.len()).collect::<Vec<_>>());

    assert!(tree.node_count() >= text.len() + 1);
    assert!(tree.node_count() <= 2 * text.len());
}

/// The full label of the path from the root down to `node`.
pub(crate) fn path_label<A: Alphabet>(tree: &SuffixTree<A>, node: NodeIdx) -> Vec<A::Symbol> {
    let mut labels = Vec::new();
    let mut current = node;
    while !current.is_root() {
        labels.push(tree.edge_label(current));
        current = tree.node(current).parent().unwrap();
    }
    labels.iter().rev().flat_map(|label| label.iter().copied()).collect()
}
