//! Tree traversal helpers.

use crate::arena::{AstArena, NodeId};
use crate::node::NodeKind;

/// All nodes reachable from `root`, preorder.
///
/// Unresolved ambiguity alternatives are reachable; committed trees only
/// expose the winners.
pub fn preorder(arena: &AstArena, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        out.push(id);
        let mut children = arena.children(id);
        children.reverse();
        stack.extend(children);
    }
    out
}

/// All name nodes reachable from `root`, preorder.
pub fn collect_names(arena: &AstArena, root: NodeId) -> Vec<NodeId> {
    preorder(arena, root)
        .into_iter()
        .filter(|&id| matches!(arena.kind(id), NodeKind::Name(_)))
        .collect()
}
