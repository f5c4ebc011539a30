//! Iterative depth-first traversal with entry/exit callbacks.
//!
//! Non-recursive: an explicit stack replaces the call stack, so arbitrarily
//! deep trees are safe. Callback state is owned by the caller (captured by the
//! closures), nothing is global.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::trace;

/// Walk the tree below `root` depth-first.
///
/// * `children` returns the children of a node, left to right. It is called
///   once per node, on entry.
/// * `on_entry` fires when a node is first reached (pre-order).
/// * `on_exit` fires after every descendant of the node has exited (post-order).
///
/// Each node is entered and exited exactly once; a node reachable through more
/// than one path is only visited the first time.
pub fn traverse_dfs<N, C, I, En, Ex>(root: N, mut children: C, mut on_entry: En, mut on_exit: Ex)
where
    N: Copy + Eq + Hash,
    C: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
    En: FnMut(N),
    Ex: FnMut(N),
{
    let mut visited = HashSet::new();
    let mut stack = vec![(root, false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            on_exit(node);
            continue;
        }
        if !visited.insert(node) {
            continue;
        }

        on_entry(node);
        stack.push((node, true));

        let pending: Vec<N> = children(node)
            .into_iter()
            .filter(|child| !visited.contains(child))
            .collect();
        // Reverse push for left-to-right visiting order
        for child in pending.into_iter().rev() {
            stack.push((child, false));
        }
    }
    trace!("traverse_dfs: visited {} nodes", visited.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    //      1
    //    / | \
    //   2  3  4
    //  / \
    // 5   6
    fn sample_tree() -> HashMap<u32, Vec<u32>> {
        let mut tree = HashMap::new();
        tree.insert(1, vec![2, 3, 4]);
        tree.insert(2, vec![5, 6]);
        tree
    }

    #[test]
    fn given_tree_when_traversing_then_entry_is_preorder_and_exit_is_postorder() {
        let tree = sample_tree();
        let mut entries = Vec::new();
        let mut exits = Vec::new();

        traverse_dfs(
            1u32,
            |n| tree.get(&n).cloned().unwrap_or_default(),
            |n| entries.push(n),
            |n| exits.push(n),
        );

        assert_eq!(entries, vec![1, 2, 5, 6, 3, 4]);
        assert_eq!(exits, vec![5, 6, 2, 3, 4, 1]);
    }

    #[test]
    fn given_shared_child_when_traversing_then_visits_it_once() {
        let mut graph: HashMap<u32, Vec<u32>> = HashMap::new();
        graph.insert(1, vec![2, 3]);
        graph.insert(2, vec![4]);
        graph.insert(3, vec![4]);
        let mut exits = Vec::new();

        traverse_dfs(
            1u32,
            |n| graph.get(&n).cloned().unwrap_or_default(),
            |_| {},
            |n| exits.push(n),
        );

        assert_eq!(exits.iter().filter(|&&n| n == 4).count(), 1);
        assert_eq!(exits.len(), 4);
    }

    #[test]
    fn given_very_deep_chain_when_traversing_then_does_not_overflow() {
        let depth = 200_000u32;
        let mut count = 0usize;

        traverse_dfs(
            0u32,
            |n| if n < depth { vec![n + 1] } else { vec![] },
            |_| {},
            |_| count += 1,
        );

        assert_eq!(count, depth as usize + 1);
    }
}
