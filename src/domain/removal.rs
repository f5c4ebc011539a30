//! Depth-biased removal of one node from a generated tree.

use generational_arena::Index;
use rand::Rng;
use tracing::{debug, instrument, trace};

use crate::domain::arena::FormTree;
use crate::domain::entities::RemovalContext;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::generator::FormGenerator;
use crate::domain::traversal::traverse_dfs;

/// Complete traversal passes tried before removal gives up.
pub const MAX_REMOVAL_ATTEMPTS: usize = 10_000;

/// Outcome of a removal: the detached subtree and where it used to sit.
#[derive(Debug, Clone)]
pub struct Removal {
    pub removed: FormTree,
    pub context: RemovalContext,
}

impl<R: Rng> FormGenerator<R> {
    /// Remove one node from `tree`, favouring deep nodes.
    ///
    /// Each pass walks the whole tree; on exit from a node, while nothing has
    /// been picked yet, the node is picked with probability `1 - zeta^depth`.
    /// Siblings are exited right to left, so later siblings are tried first.
    /// A pass that picks nothing restarts from the root. The root has
    /// probability 0 and is never removed.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn remove_random_node(&mut self, tree: &mut FormTree) -> DomainResult<Removal> {
        let root = tree
            .root()
            .ok_or_else(|| DomainError::NodeNotFound("root of empty tree".to_string()))?;

        let mut selected: Option<Index> = None;
        for attempt in 1..=MAX_REMOVAL_ATTEMPTS {
            let random = &mut self.random;
            let params = &self.params;
            let view: &FormTree = tree;

            traverse_dfs(
                root,
                |idx| view.children(idx).iter().rev().copied().collect::<Vec<_>>(),
                |_| {},
                |idx| {
                    if selected.is_some() {
                        return;
                    }
                    let Some(node) = view.get_node(idx) else {
                        return;
                    };
                    if random.random_bool(params.removal_probability(node.data.depth)) {
                        selected = Some(idx);
                    }
                },
            );

            if selected.is_some() {
                trace!("remove_random_node: selected on pass {attempt}");
                break;
            }
        }

        let idx = selected.ok_or(DomainError::RemovalExhausted {
            attempts: MAX_REMOVAL_ATTEMPTS,
        })?;
        let context = removal_context(tree, idx);
        let removed = tree.detach(idx)?;

        debug!(
            "remove_random_node: removed {} node(s), {} remain",
            removed.len(),
            tree.len()
        );
        Ok(Removal { removed, context })
    }
}

/// Parent and immediate siblings of `idx`, captured before it is detached.
fn removal_context(tree: &FormTree, idx: Index) -> RemovalContext {
    let Some(parent_idx) = tree.get_node(idx).and_then(|node| node.parent) else {
        return RemovalContext::default();
    };

    let siblings = tree.children(parent_idx);
    let position = siblings.iter().position(|&child| child == idx);
    let summary = |i: Index| tree.get_node(i).map(|node| node.summary());

    RemovalContext {
        parent: summary(parent_idx),
        preceding_sibling: position
            .and_then(|p| p.checked_sub(1))
            .and_then(|p| siblings.get(p).copied())
            .and_then(summary),
        following_sibling: position
            .and_then(|p| siblings.get(p + 1).copied())
            .and_then(summary),
    }
}
