//! Processing order for the forest builder.
//!
//! The builder needs every ancestor processed before its descendants.
//! `ByParentId` (ascending parent id, roots first) only guarantees that for
//! two levels; `Topological` guarantees it for any depth.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::Comment;
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildOrder {
    /// Trust the caller's order
    AsGiven,
    /// Stable sort by immediate parent id, roots first
    #[serde(rename = "parent-id", alias = "by-parent-id")]
    ByParentId,
    /// Breadth-first from the roots; ties keep input order
    #[default]
    Topological,
}

impl BuildOrder {
    /// `true` -> `AsGiven`, `false` -> `ByParentId`.
    pub fn from_assume_sorted(assume_sorted: bool) -> Self {
        if assume_sorted {
            Self::AsGiven
        } else {
            Self::ByParentId
        }
    }

    #[instrument(level = "debug", skip(comments), fields(n = comments.len()))]
    pub fn apply(self, comments: Vec<Comment>) -> DomainResult<Vec<Comment>> {
        match self {
            Self::AsGiven => Ok(comments),
            Self::ByParentId => Ok(sort_by_parent_id(comments)),
            Self::Topological => sort_topologically(comments),
        }
    }
}

impl fmt::Display for BuildOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AsGiven => "as-given",
            Self::ByParentId => "parent-id",
            Self::Topological => "topological",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BuildOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "as-given" | "sorted" => Ok(Self::AsGiven),
            "parent-id" | "by-parent-id" => Ok(Self::ByParentId),
            "topological" | "topo" => Ok(Self::Topological),
            other => Err(format!(
                "unknown build order '{}' (expected as-given, parent-id or topological)",
                other
            )),
        }
    }
}

/// Stable sort by ascending parent id; `None` sorts first.
pub fn sort_by_parent_id(comments: Vec<Comment>) -> Vec<Comment> {
    comments
        .into_iter()
        .sorted_by_key(|c| c.parent_id)
        .collect()
}

/// Breadth-first order from the roots.
///
/// Comments whose ancestry ends in a missing id are appended after the
/// reachable ones, the dangling ones first, so the builder reports
/// `UnknownParent` for the comment that actually dangles.
///
/// # Errors
/// * `MalformedRecord` - a comment has no id
/// * `DuplicateId` - an id occurs twice
/// * `CorruptChain` - a comment's ancestry loops and never reaches a root
pub fn sort_topologically(comments: Vec<Comment>) -> DomainResult<Vec<Comment>> {
    let mut position: HashMap<i64, usize> = HashMap::with_capacity(comments.len());
    for (i, c) in comments.iter().enumerate() {
        let id = c
            .id
            .ok_or_else(|| DomainError::malformed(format!("comment without id: {:?}", c)))?;
        if position.insert(id, i).is_some() {
            return Err(DomainError::DuplicateId { node: c.clone() });
        }
    }

    let mut replies: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut queue = VecDeque::new();
    for (i, c) in comments.iter().enumerate() {
        match c.parent_id {
            None => queue.push_back(i),
            Some(p) => replies.entry(p).or_default().push(i),
        }
    }

    let mut placed = vec![false; comments.len()];
    let mut order = Vec::with_capacity(comments.len());
    while let Some(i) = queue.pop_front() {
        placed[i] = true;
        order.push(i);
        if let Some(kids) = comments[i].id.and_then(|id| replies.get(&id)) {
            queue.extend(kids.iter().copied());
        }
    }

    let leftovers: Vec<usize> = (0..comments.len()).filter(|&i| !placed[i]).collect();
    if !leftovers.is_empty() {
        debug!("{} comments unreachable from any root", leftovers.len());
        let mut dangling = Vec::new();
        let mut below_dangling = Vec::new();
        for &i in &leftovers {
            match ancestry_end(&comments, &position, i) {
                Ancestry::Loops => {
                    return Err(DomainError::CorruptChain {
                        node: comments[i].clone(),
                    })
                }
                Ancestry::Dangles if is_missing_parent(&comments[i], &position) => {
                    dangling.push(i)
                }
                Ancestry::Dangles => below_dangling.push(i),
            }
        }
        order.extend(dangling);
        order.extend(below_dangling);
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    Ok(order.iter().filter_map(|&i| slots[i].take()).collect())
}

enum Ancestry {
    Loops,
    Dangles,
}

/// Follow parent ids upward from an unreachable comment.
fn ancestry_end(comments: &[Comment], position: &HashMap<i64, usize>, start: usize) -> Ancestry {
    let mut seen = HashSet::new();
    let mut current = start;
    loop {
        if !seen.insert(current) {
            return Ancestry::Loops;
        }
        match comments[current].parent_id.and_then(|p| position.get(&p)) {
            Some(&parent) => current = parent,
            // Unreachable comments are never roots, so no parent id here means it is missing
            None => return Ancestry::Dangles,
        }
    }
}

fn is_missing_parent(comment: &Comment, position: &HashMap<i64, usize>) -> bool {
    comment
        .parent_id
        .map(|p| !position.contains_key(&p))
        .unwrap_or(false)
}
