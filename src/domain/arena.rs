use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{FieldState, NodeData, NodeRole, NodeSummary};
use crate::domain::error::{DomainError, DomainResult};

/// Variant payload of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Branching node; children are ordered.
    Form { children: Vec<Index> },
    /// Terminal node, optionally carrying state.
    Field { state: Option<FieldState> },
}

/// Tree node in the arena-based form hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub data: NodeData,
    pub kind: NodeKind,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
}

impl TreeNode {
    pub fn children(&self) -> &[Index] {
        match &self.kind {
            NodeKind::Form { children } => children,
            NodeKind::Field { .. } => &[],
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self.kind, NodeKind::Form { .. })
    }

    /// Copy of the node without its subtree.
    pub fn summary(&self) -> NodeSummary {
        let role = match &self.kind {
            NodeKind::Form { .. } => NodeRole::Form,
            NodeKind::Field { state } => NodeRole::Field {
                state: state.clone(),
            },
        };
        NodeSummary {
            data: self.data.clone(),
            role,
        }
    }
}

/// Arena-based form tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Node identity is the arena index, never structural equality.
#[derive(Debug, Clone)]
pub struct FormTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for FormTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FormTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node; without a parent it becomes the root.
    #[instrument(level = "trace", skip(self, data, kind))]
    pub fn insert_node(
        &mut self,
        data: NodeData,
        kind: NodeKind,
        parent: Option<Index>,
    ) -> DomainResult<Index> {
        if let Some(parent_idx) = parent {
            match self.arena.get(parent_idx) {
                Some(node) if node.is_form() => {}
                Some(node) => return Err(DomainError::InvalidParent(node.data.id.clone())),
                None => return Err(DomainError::NodeNotFound(format!("{parent_idx:?}"))),
            }
        }

        let node_idx = self.arena.insert(TreeNode { data, kind, parent });

        match parent {
            Some(parent_idx) => {
                if let Some(TreeNode {
                    kind: NodeKind::Form { children },
                    ..
                }) = self.arena.get_mut(parent_idx)
                {
                    children.push(node_idx);
                }
            }
            None => self.root = Some(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    /// Children of a node, empty for fields and unknown indices.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena.get(idx).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iterator, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels below and including the root.
    pub fn height(&self) -> usize {
        let Some(root) = self.root_node() else {
            return 0;
        };
        let base = root.data.depth;
        self.iter()
            .map(|(_, node)| (node.data.depth - base) as usize + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.id == id)
            .map(|(idx, _)| idx)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|(_, node)| node.data.id.as_str()).collect()
    }

    /// Unlink `idx` from its parent and move its subtree into a new tree.
    ///
    /// Child order and stored depths are kept. Detaching the root leaves
    /// `self` empty.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, idx: Index) -> DomainResult<FormTree> {
        let parent = self
            .arena
            .get(idx)
            .ok_or_else(|| DomainError::NodeNotFound(format!("{idx:?}")))?
            .parent;

        match parent {
            Some(parent_idx) => {
                if let Some(TreeNode {
                    kind: NodeKind::Form { children },
                    ..
                }) = self.arena.get_mut(parent_idx)
                {
                    children.retain(|&child| child != idx);
                }
            }
            None => self.root = None,
        }

        let mut detached = FormTree::new();
        let mut stack = vec![(idx, None)];

        while let Some((old_idx, new_parent)) = stack.pop() {
            let node = self
                .arena
                .remove(old_idx)
                .ok_or_else(|| DomainError::NodeNotFound(format!("{old_idx:?}")))?;

            let (kind, old_children) = match node.kind {
                NodeKind::Form { children } => (NodeKind::Form { children: Vec::new() }, children),
                NodeKind::Field { state } => (NodeKind::Field { state }, Vec::new()),
            };
            let new_idx = detached.insert_node(node.data, kind, new_parent)?;

            for child in old_children.into_iter().rev() {
                stack.push((child, Some(new_idx)));
            }
        }

        Ok(detached)
    }

    /// Outline of the tree for terminal display.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn label(node: &TreeNode) -> String {
            match &node.kind {
                NodeKind::Form { .. } => {
                    format!("form {} [{}]", node.data.id, node.data.usage.component)
                }
                NodeKind::Field { state: Some(state) } => format!(
                    "field {} [{}] {}{}",
                    node.data.id,
                    node.data.usage.component,
                    state.data_type,
                    if state.is_array { "[]" } else { "" }
                ),
                NodeKind::Field { state: None } => {
                    format!("field {} [{}]", node.data.id, node.data.usage.component)
                }
            }
        }

        fn build(tree: &FormTree, idx: Index, parent: &mut Tree<String>) {
            for &child_idx in tree.children(idx) {
                if let Some(child) = tree.get_node(child_idx) {
                    let mut child_tree = Tree::new(label(child));
                    build(tree, child_idx, &mut child_tree);
                    parent.push(child_tree);
                }
            }
        }

        match self.root_node().zip(self.root) {
            Some((node, root_idx)) => {
                let mut tree = Tree::new(label(node));
                build(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a FormTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a FormTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
