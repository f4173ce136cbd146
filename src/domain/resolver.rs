//! Ancestor resolution: where does a comment belong in the forest?

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::cache::FlatCache;
use crate::domain::entities::Comment;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::forest::Forest;

/// Finds the children container a comment must be inserted into.
pub struct AncestorResolver<'a> {
    forest: &'a Forest,
    cache: &'a FlatCache,
}

impl<'a> AncestorResolver<'a> {
    pub fn new(forest: &'a Forest, cache: &'a FlatCache) -> Self {
        Self { forest, cache }
    }

    /// Locate the children container for `comment`.
    ///
    /// Returns `None` for the top level (root comments) and `Some(parent)`
    /// for the children container of an already inserted parent.
    ///
    /// # Errors
    /// * `UnknownParent` - the parent id has not been cached yet
    /// * `CorruptChain` - the cached handle is dead or points at another comment
    #[instrument(level = "trace", skip(self, comment), fields(id = ?comment.id, parent_id = ?comment.parent_id))]
    pub fn locate(&self, comment: &Comment) -> DomainResult<Option<Index>> {
        let Some(parent_id) = comment.parent_id else {
            return Ok(None);
        };
        let parent_idx = self
            .cache
            .get(parent_id)
            .ok_or_else(|| DomainError::UnknownParent {
                node: comment.clone(),
            })?;

        match self.forest.comment(parent_idx) {
            Some(parent) if parent.id == Some(parent_id) => Ok(Some(parent_idx)),
            _ => Err(DomainError::CorruptChain {
                node: comment.clone(),
            }),
        }
    }

    /// Ancestor chain of `idx`, root first and `idx` last.
    ///
    /// Walks parent links recursively; recursion depth is bounded by the
    /// forest size, so a looping chain fails instead of overflowing.
    pub fn chain(forest: &Forest, idx: Index) -> DomainResult<Vec<Index>> {
        let mut path = Vec::new();
        Self::walk(forest, idx, None, 0, &mut path)?;
        Ok(path)
    }

    fn walk(
        forest: &Forest,
        idx: Index,
        from: Option<&Comment>,
        depth: usize,
        path: &mut Vec<Index>,
    ) -> DomainResult<()> {
        let corrupt = |node: Option<&Comment>| DomainError::CorruptChain {
            node: node.cloned().unwrap_or_default(),
        };
        let node = forest.get_node(idx).ok_or_else(|| corrupt(from))?;
        if depth >= forest.len() {
            return Err(corrupt(Some(&node.comment)));
        }
        trace!(depth, comment = %node.comment, "walk");
        if let Some(parent) = node.parent {
            Self::walk(forest, parent, Some(&node.comment), depth + 1, path)?;
        }
        path.push(idx);
        Ok(())
    }
}
