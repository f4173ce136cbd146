//! Rendering of a built forest.
//!
//! `Forest::render` is the lazy pre-order view every other output is derived
//! from; `TreeNodeConvert` goes through termtree for box-drawing output.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::forest::{Forest, ForestIterator};

/// Lazy pre-order sequence of `(depth, text)` pairs.
///
/// Depth restarts at 0 for every root and grows by one per nesting level.
pub struct Render<'a> {
    inner: ForestIterator<'a>,
}

impl<'a> Iterator for Render<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(depth, _, node)| (depth, node.comment.text_or_empty()))
    }
}

impl Forest {
    pub fn render(&self) -> Render<'_> {
        Render { inner: self.iter() }
    }
}

/// One line per comment, indented by `indent` spaces per level.
#[instrument(level = "debug", skip(forest))]
pub fn render_text(forest: &Forest, indent: usize) -> String {
    let mut out = String::new();
    for (depth, text) in forest.render() {
        out.push_str(&" ".repeat(depth * indent));
        out.push_str(text);
        out.push('\n');
    }
    out
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Vec<Tree<String>>;
}

impl TreeNodeConvert for Forest {
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        fn label(forest: &Forest, idx: Index) -> String {
            forest
                .comment(idx)
                .map(|c| match c.id {
                    Some(id) => format!("#{} {}", id, c.text_or_empty()),
                    None => c.text_or_empty().to_string(),
                })
                .unwrap_or_default()
        }

        fn build_tree(forest: &Forest, node_idx: Index, parent_tree: &mut Tree<String>) {
            for &child_idx in forest.children(node_idx) {
                let mut child_tree = Tree::new(label(forest, child_idx));
                build_tree(forest, child_idx, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        self.roots()
            .iter()
            .map(|&root_idx| {
                let mut tree = Tree::new(label(self, root_idx));
                build_tree(self, root_idx, &mut tree);
                tree
            })
            .collect()
    }
}

/// All roots rendered with termtree, one block per thread.
pub fn render_tree(forest: &Forest) -> String {
    forest
        .to_tree_string()
        .iter()
        .map(|t| t.to_string())
        .collect()
}
