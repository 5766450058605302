use generational_arena::{Arena, Index};
use std::fmt;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::entities::{Category, SortedEntry};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::sorter::sort_with_depth;

/// Deepest level the tree rendering accepts; rendered width grows with depth.
pub const MAX_TREE_DEPTH: usize = 1_000;

/// Data payload for forest nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Category id
    pub id: String,
    /// Resolved display label
    pub label: String,
    /// Node came from the orphan tail
    pub orphan: bool,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Category data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in sibling order
    pub children: Vec<Index>,
}

/// Arena-based forest holding a whole category listing.
///
/// Roots are kept in display order; well-formed roots first, then one
/// single-node root per orphan-tail entry.
#[derive(Debug)]
pub struct CategoryForest {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
}

impl Default for CategoryForest {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryForest {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Build a forest from an unordered category listing.
    #[instrument(level = "debug", skip(categories), fields(count = categories.len()))]
    pub fn build(categories: &[Category]) -> Self {
        Self::from_entries(&sort_with_depth(categories))
    }

    /// Build a forest from an already depth-annotated ordering.
    ///
    /// Each entry's parent is the most recent entry one level up.
    pub fn from_entries(entries: &[SortedEntry<'_>]) -> Self {
        let mut forest = Self::new();
        let mut path: Vec<Index> = Vec::new();

        for entry in entries {
            path.truncate(entry.depth);
            let data = NodeData {
                id: entry.category.id().to_string(),
                label: entry.category.label().to_string(),
                orphan: entry.orphan,
            };
            let idx = forest.insert_node(data, path.last().copied());
            path.push(idx);
        }

        forest
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iteration yielding `(depth, node)`.
    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(self)
    }

    /// Maximum node depth, roots at 0. Also 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Labels of all childless nodes, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.label.clone())
            .collect()
    }

    /// Render as a `termtree` under a synthetic root.
    ///
    /// Fails with [`DomainError::TooDeep`] beyond [`MAX_TREE_DEPTH`].
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_string(&self, root_label: &str) -> DomainResult<String> {
        let depth = self.depth();
        if depth > MAX_TREE_DEPTH {
            return Err(DomainError::TooDeep {
                depth,
                limit: MAX_TREE_DEPTH,
            });
        }

        // Reverse pre-order: every node is reached after all of its
        // descendants, whose finished subtrees sit on top of `built`.
        let nodes: Vec<(usize, &TreeNode)> = self.iter().collect();
        let mut built: Vec<(usize, Tree<String>)> = Vec::new();
        for (depth, node) in nodes.into_iter().rev() {
            let mut leaves = Vec::with_capacity(node.children.len());
            while built.last().is_some_and(|(d, _)| *d > depth) {
                if let Some((_, leaf)) = built.pop() {
                    leaves.push(leaf);
                }
            }
            built.push((depth, Tree::new(node.data.label.clone()).with_leaves(leaves)));
        }

        let roots: Vec<Tree<String>> = built.into_iter().rev().map(|(_, tree)| tree).collect();
        let tree = Tree::new(root_label.to_string()).with_leaves(roots);
        let rendered = tree.to_string();
        dismantle(tree);
        debug!(depth, bytes = rendered.len(), "rendered tree");
        Ok(rendered)
    }
}

/// Drop a tree level by level; nested drop glue recurses once per level.
fn dismantle(tree: Tree<String>) {
    let mut pending = vec![tree];
    while let Some(mut tree) = pending.pop() {
        pending.append(&mut tree.leaves);
    }
}

pub struct ForestIterator<'a> {
    forest: &'a CategoryForest,
    stack: Vec<(Index, usize)>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a CategoryForest) -> Self {
        let stack = forest.roots.iter().rev().map(|&idx| (idx, 0)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((depth, node));
            }
        }
        None
    }
}
