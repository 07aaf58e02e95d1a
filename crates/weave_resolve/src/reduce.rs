//! Tree Reducer: drops the inferred, non-branching top of the merged tree.

use crate::merge::ConnTree;

/// Returns the smallest subtree that still has to be realized.
///
/// Descends from the root while the current hop was inferred and has a
/// single child. The hop where the descent stops survives when it is
/// explicit or branches; otherwise the request carries no information
/// worth realizing and `None` is returned.
pub fn reduce(tree: ConnTree) -> Option<ConnTree> {
    let mut current = tree;
    while !current.node.explicit && current.children.len() == 1 {
        match current.children.pop() {
            Some(child) => current = child,
            None => break,
        }
    }
    if current.node.explicit || current.children.len() > 1 {
        Some(current)
    } else {
        None
    }
}
