//! Forest builder: one pass over parent-linked comments.

use tracing::{debug, instrument, trace};

use crate::domain::cache::FlatCache;
use crate::domain::entities::Comment;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::forest::Forest;
use crate::domain::ordering::BuildOrder;
use crate::domain::resolver::AncestorResolver;

/// Constructs a forest of comment threads from a flat list.
///
/// Cache and forest are created per call; the builder itself holds only the
/// processing order and can be reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForestBuilder {
    order: BuildOrder,
}

impl ForestBuilder {
    pub fn new(order: BuildOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> BuildOrder {
        self.order
    }

    /// Build the forest.
    ///
    /// Comments are reordered according to the configured [`BuildOrder`] and
    /// then inserted in a single pass. Every comment needs an id; a reply
    /// needs its parent inserted before it.
    ///
    /// # Errors
    /// * `MalformedRecord` - a comment has no id
    /// * `DuplicateId` - an id was already inserted
    /// * `UnknownParent` - a reply's parent has not been inserted (yet)
    /// * `CorruptChain` - the ancestry of a comment is inconsistent
    #[instrument(level = "debug", skip(self, comments), fields(order = %self.order))]
    pub fn build<I>(&self, comments: I) -> DomainResult<Forest>
    where
        I: IntoIterator<Item = Comment>,
    {
        let comments = self.order.apply(comments.into_iter().collect())?;
        debug!("building forest from {} comments", comments.len());

        let mut forest = Forest::new();
        let mut cache = FlatCache::with_capacity(comments.len());

        for comment in comments {
            let Some(id) = comment.id else {
                return Err(DomainError::malformed(format!(
                    "comment without id: {:?}",
                    comment
                )));
            };
            if cache.contains(id) {
                return Err(DomainError::DuplicateId { node: comment });
            }

            let container = AncestorResolver::new(&forest, &cache).locate(&comment)?;
            let idx = match container {
                None => forest.insert_root(comment),
                Some(parent) => forest.insert_child(parent, comment)?,
            };
            trace!(id, ?idx, "inserted");
            cache.record(id, idx);
        }

        debug!(
            "built forest: {} comments, {} roots",
            forest.len(),
            forest.roots().len()
        );
        Ok(forest)
    }
}

/// Build a forest, trusting the input order when `assume_sorted` is set and
/// sorting by parent id (roots first) otherwise.
pub fn build_forest<I>(comments: I, assume_sorted: bool) -> DomainResult<Forest>
where
    I: IntoIterator<Item = Comment>,
{
    ForestBuilder::new(BuildOrder::from_assume_sorted(assume_sorted)).build(comments)
}
