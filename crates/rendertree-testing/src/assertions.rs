//! Assertion helpers for canonical trees
//!
//! Failures print both trees in their indented text form so mismatches can
//! be read off the test output.

use rendertree_adapter::RstNode;
use rendertree_core::{Component, Leaf};

/// Assert that two trees are structurally equal, ignoring instances.
pub fn assert_tree_eq(actual: &RstNode, expected: &RstNode, msg: &str) {
    let actual = actual.clone().cleaned();
    let expected = expected.clone().cleaned();
    assert!(
        actual == expected,
        "{}: trees differ\nexpected:\n{}\nactual:\n{}",
        msg,
        expected,
        actual
    );
}

/// Assert how many children a node rendered.
pub fn assert_rendered_len(node: &RstNode, expected: usize, msg: &str) {
    assert_eq!(
        node.rendered.len(),
        expected,
        "{}: expected {} rendered children, found {} in\n{}",
        msg,
        expected,
        node.rendered.len(),
        node
    );
}

/// Assert that a node carries a live instance of `C`.
pub fn assert_instance_of<C: Component>(node: &RstNode, msg: &str) {
    let matches = node
        .instance
        .as_ref()
        .is_some_and(|instance| instance.is::<C>());
    assert!(
        matches,
        "{}: expected a live {} instance on `{}`, found {:?}",
        msg,
        rendertree_core::short_type_name::<C>(),
        node.display_name(),
        node.instance
    );
}

/// Assert the leaves of a subtree, in document order.
pub fn assert_leaves(node: &RstNode, expected: &[Leaf], msg: &str) {
    let actual: Vec<Leaf> = node.leaves().into_iter().cloned().collect();
    assert_eq!(actual, expected, "{}: leaves differ", msg);
}
