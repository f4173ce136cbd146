//! Arena-backed forest of comment threads.

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::entities::Comment;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::resolver::AncestorResolver;

/// Node in the arena-based forest.
#[derive(Debug)]
pub struct ForestNode {
    /// Comment stored at this node
    pub comment: Comment,
    /// Index of parent node in the arena, None for roots
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// A comment with its replies, nested. Serializes flat-merged:
/// `{"id":1,"text":"a","parent_id":null,"children":[...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub children: Vec<CommentThread>,
}

/// Disjoint union of rooted comment trees.
///
/// Every node gets a stable arena handle on insertion; structure is kept as
/// handle -> child handles, never keyed on comment values. Roots and children
/// keep their insertion order.
#[derive(Debug)]
pub struct Forest {
    arena: Arena<ForestNode>,
    roots: Vec<Index>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a top-level comment with no children.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_root(&mut self, comment: Comment) -> Index {
        let idx = self.arena.insert(ForestNode {
            comment,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(idx);
        idx
    }

    /// Insert `comment` into the children container of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_child(&mut self, parent: Index, comment: Comment) -> DomainResult<Index> {
        if !self.arena.contains(parent) {
            return Err(DomainError::CorruptChain { node: comment });
        }
        let idx = self.arena.insert(ForestNode {
            comment,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(idx);
        }
        Ok(idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&ForestNode> {
        self.arena.get(idx)
    }

    pub fn comment(&self, idx: Index) -> Option<&Comment> {
        self.arena.get(idx).map(|n| &n.comment)
    }

    /// Top-level handles.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Children container of a node; empty for unknown handles.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Linear scan for the node carrying `id`.
    pub fn find_by_id(&self, id: i64) -> Option<Index> {
        self.iter()
            .find(|(_, _, node)| node.comment.id == Some(id))
            .map(|(_, idx, _)| idx)
    }

    /// Handles from the root down to `idx`, inclusive.
    pub fn path_to_root(&self, idx: Index) -> DomainResult<Vec<Index>> {
        AncestorResolver::chain(self, idx)
    }

    /// Pre-order traversal over all trees, yielding `(depth, index, node)`.
    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(self)
    }

    /// Number of levels in the deepest tree; 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _, _)| depth + 1).max().unwrap_or(0)
    }

    /// Comments without replies, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<&Comment> {
        self.iter()
            .filter(|(_, _, node)| node.children.is_empty())
            .map(|(_, _, node)| &node.comment)
            .collect()
    }

    /// Nested owned view of the whole forest.
    pub fn to_threads(&self) -> Vec<CommentThread> {
        self.roots.iter().filter_map(|&r| self.thread(r)).collect()
    }

    fn thread(&self, idx: Index) -> Option<CommentThread> {
        let node = self.arena.get(idx)?;
        Some(CommentThread {
            comment: node.comment.clone(),
            children: node
                .children
                .iter()
                .filter_map(|&c| self.thread(c))
                .collect(),
        })
    }
}

pub struct ForestIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(usize, Index)>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Reverse so the first root is popped first
        let stack = forest.roots.iter().rev().map(|&r| (0, r)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (usize, Index, &'a ForestNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, current_idx)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((depth + 1, child));
                }
                return Some((depth, current_idx, node));
            }
        }
        None
    }
}
