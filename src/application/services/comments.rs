//! Comment thread service
//!
//! Fetches rows from a comment source, rebuilds the forest and renders it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    render_text, render_tree, BuildOrder, Comment, CommentThread, DomainError, Forest,
    ForestBuilder,
};
use crate::infrastructure::traits::CommentSource;

/// Shape of a built forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForestSummary {
    pub comments: usize,
    pub roots: usize,
    pub depth: usize,
    pub leaves: usize,
}

impl ForestSummary {
    pub fn of(forest: &Forest) -> Self {
        Self {
            comments: forest.len(),
            roots: forest.roots().len(),
            depth: forest.depth(),
            leaves: forest.leaf_nodes().len(),
        }
    }
}

/// Service for reading and extending comment threads.
pub struct CommentService {
    source: Arc<dyn CommentSource>,
    builder: ForestBuilder,
}

impl CommentService {
    /// Create a new comment service.
    pub fn new(source: Arc<dyn CommentSource>, order: BuildOrder) -> Self {
        Self {
            source,
            builder: ForestBuilder::new(order),
        }
    }

    pub fn order(&self) -> BuildOrder {
        self.builder.order()
    }

    /// All comments from the source, in source order.
    pub fn comments(&self) -> ApplicationResult<Vec<Comment>> {
        let records = self.source.fetch_ordered().with_context("fetch comments")?;
        debug!("comments: fetched {} records", records.len());
        Ok(Comment::from_records(&records)?)
    }

    /// Fetch and rebuild the forest.
    #[instrument(level = "debug", skip(self))]
    pub fn forest(&self) -> ApplicationResult<Forest> {
        let comments = self.comments()?;
        Ok(self.builder.build(comments)?)
    }

    pub fn render_text(&self, indent: usize) -> ApplicationResult<String> {
        Ok(render_text(&self.forest()?, indent))
    }

    pub fn render_tree(&self) -> ApplicationResult<String> {
        Ok(render_tree(&self.forest()?))
    }

    pub fn threads(&self) -> ApplicationResult<Vec<CommentThread>> {
        Ok(self.forest()?.to_threads())
    }

    pub fn summary(&self) -> ApplicationResult<ForestSummary> {
        Ok(ForestSummary::of(&self.forest()?))
    }

    /// Store a new comment and return it with its assigned id.
    ///
    /// A reply must reference an existing comment. The parent check and the
    /// insert are separate source calls, so concurrent writers to one store
    /// can race on the assigned id.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&self, text: &str, parent_id: Option<i64>) -> ApplicationResult<Comment> {
        if text.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "comment text must not be empty".into(),
            ));
        }

        if let Some(parent) = parent_id {
            let exists = self.comments()?.iter().any(|c| c.id == Some(parent));
            if !exists {
                return Err(DomainError::UnknownParent {
                    node: Comment::new(None, Some(text), parent_id),
                }
                .into());
            }
        }

        let record = self
            .source
            .insert(text, parent_id)
            .with_context("insert comment")?;
        let comment = Comment::from_record(&record)?;
        info!("added comment {}", comment);
        Ok(comment)
    }
}
