//! Tests for ForestBuilder

use std::collections::{HashMap, HashSet};

use rstest::rstest;

use comtree::domain::{build_forest, BuildOrder, Comment, DomainError, Forest, ForestBuilder};
use comtree::util::testing;

fn ids_at_top(forest: &Forest) -> Vec<i64> {
    forest
        .roots()
        .iter()
        .filter_map(|&r| forest.comment(r).and_then(|c| c.id))
        .collect()
}

fn child_ids(forest: &Forest, id: i64) -> Vec<i64> {
    let idx = forest.find_by_id(id).expect("node present");
    forest
        .children(idx)
        .iter()
        .filter_map(|&c| forest.comment(c).and_then(|c| c.id))
        .collect()
}

/// Parent id of every node as implied by its nesting position.
fn derived_parents(forest: &Forest) -> HashMap<i64, Option<i64>> {
    forest
        .iter()
        .filter_map(|(_, _, node)| {
            let id = node.comment.id?;
            let parent = node
                .parent
                .and_then(|p| forest.comment(p))
                .and_then(|c| c.id);
            Some((id, parent))
        })
        .collect()
}

/// A mixed forest: two threads, one three levels deep.
fn sample_comments() -> Vec<Comment> {
    vec![
        Comment::root(1, "first"),
        Comment::root(2, "second"),
        Comment::reply(3, "re first", 1),
        Comment::reply(4, "re second", 2),
        Comment::reply(5, "re re first", 3),
        Comment::reply(6, "another re first", 1),
    ]
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_single_root_when_building_sorted_then_forest_has_one_empty_thread() {
    testing::init_test_setup();
    // Arrange
    let comments = vec![Comment::root(1, "root")];

    // Act
    let forest = build_forest(comments, true).unwrap();

    // Assert
    assert_eq!(forest.len(), 1);
    let root = forest.roots()[0];
    assert_eq!(forest.comment(root), Some(&Comment::new(Some(1), Some("root"), None)));
    assert!(forest.children(root).is_empty());
}

#[test]
fn given_root_and_child_when_building_sorted_then_child_nested_under_root() {
    // Arrange
    let comments = vec![Comment::root(1, "root"), Comment::reply(2, "child", 1)];

    // Act
    let forest = build_forest(comments, true).unwrap();

    // Assert
    assert_eq!(ids_at_top(&forest), vec![1]);
    assert_eq!(child_ids(&forest, 1), vec![2]);
    assert!(child_ids(&forest, 2).is_empty());
}

#[test]
fn given_three_level_chain_when_building_then_nested_three_deep() {
    // Arrange
    let comments = vec![
        Comment::root(1, "a"),
        Comment::reply(2, "b", 1),
        Comment::reply(3, "c", 2),
    ];

    // Act
    let forest = build_forest(comments, true).unwrap();

    // Assert
    assert_eq!(ids_at_top(&forest), vec![1]);
    assert_eq!(child_ids(&forest, 1), vec![2]);
    assert_eq!(child_ids(&forest, 2), vec![3]);
    assert_eq!(forest.depth(), 3);
}

#[test]
fn given_child_before_parent_when_building_sorted_then_unknown_parent() {
    // Arrange
    let comments = vec![Comment::reply(2, "b", 1), Comment::root(1, "a")];

    // Act
    let result = build_forest(comments, true);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::UnknownParent {
            node: Comment::reply(2, "b", 1)
        }
    );
}

#[test]
fn given_child_before_parent_when_building_unsorted_then_reorders_and_succeeds() {
    // Arrange
    let comments = vec![Comment::reply(2, "b", 1), Comment::root(1, "a")];

    // Act
    let forest = build_forest(comments, false).unwrap();

    // Assert
    assert_eq!(ids_at_top(&forest), vec![1]);
    assert_eq!(child_ids(&forest, 1), vec![2]);
}

// ============================================================
// Properties
// ============================================================

#[rstest]
#[case(BuildOrder::AsGiven)]
#[case(BuildOrder::ByParentId)]
#[case(BuildOrder::Topological)]
fn given_well_formed_input_when_building_then_every_comment_appears_once(
    #[case] order: BuildOrder,
) {
    let comments = sample_comments();
    let forest = ForestBuilder::new(order).build(comments.clone()).unwrap();

    let seen: Vec<&Comment> = forest.iter().map(|(_, _, n)| &n.comment).collect();
    assert_eq!(seen.len(), comments.len());
    let unique: HashSet<&Comment> = seen.iter().copied().collect();
    assert_eq!(unique, comments.iter().collect::<HashSet<_>>());
}

#[rstest]
#[case(BuildOrder::AsGiven)]
#[case(BuildOrder::ByParentId)]
#[case(BuildOrder::Topological)]
fn given_well_formed_input_when_building_then_nesting_reproduces_parent_links(
    #[case] order: BuildOrder,
) {
    let comments = sample_comments();
    let forest = ForestBuilder::new(order).build(comments.clone()).unwrap();

    let derived = derived_parents(&forest);
    for c in &comments {
        assert_eq!(derived[&c.id.unwrap()], c.parent_id, "parent of {}", c);
    }
}

#[test]
fn given_built_forest_when_walking_each_chain_then_it_follows_parent_ids_to_a_root() {
    let forest = ForestBuilder::default().build(sample_comments()).unwrap();

    for (depth, idx, node) in forest.iter() {
        let chain = forest.path_to_root(idx).unwrap();
        assert_eq!(chain.len(), depth + 1);
        assert!(forest.comment(chain[0]).unwrap().is_root());
        // each step down the chain is a child of the previous one
        for pair in chain.windows(2) {
            let parent = forest.comment(pair[0]).unwrap();
            let child = forest.comment(pair[1]).unwrap();
            assert_eq!(child.parent_id, parent.id);
        }
        assert_eq!(forest.comment(*chain.last().unwrap()), Some(&node.comment));
    }
}

#[test]
fn given_same_input_when_rebuilding_then_structure_is_identical() {
    let first = ForestBuilder::default().build(sample_comments()).unwrap();
    let second = ForestBuilder::default().build(sample_comments()).unwrap();

    assert_eq!(first.to_threads(), second.to_threads());
}

#[test]
fn given_shuffled_input_when_rebuilding_then_grouping_is_invariant() {
    let mut shuffled = sample_comments();
    shuffled.reverse();

    let a = ForestBuilder::new(BuildOrder::Topological)
        .build(sample_comments())
        .unwrap();
    let b = ForestBuilder::new(BuildOrder::Topological)
        .build(shuffled)
        .unwrap();

    assert_eq!(derived_parents(&a), derived_parents(&b));
}

#[test]
fn given_identical_content_with_distinct_ids_when_building_then_both_kept() {
    let comments = vec![
        Comment::root(1, "same"),
        Comment::reply(2, "dup", 1),
        Comment::reply(3, "dup", 1),
    ];

    let forest = build_forest(comments, true).unwrap();

    assert_eq!(child_ids(&forest, 1), vec![2, 3]);
}

// ============================================================
// Ordering contract
// ============================================================

#[test]
fn given_deep_chain_with_unrelated_ids_when_sorting_by_parent_id_then_unknown_parent() {
    // 30 <- 20 <- 10: immediate parent id order processes 10 before 20
    let comments = vec![
        Comment::root(30, "a"),
        Comment::reply(20, "b", 30),
        Comment::reply(10, "c", 20),
    ];

    let result = ForestBuilder::new(BuildOrder::ByParentId).build(comments);

    assert!(matches!(result, Err(DomainError::UnknownParent { node }) if node.id == Some(10)));
}

#[test]
fn given_deep_chain_with_unrelated_ids_when_sorting_topologically_then_succeeds() {
    let comments = vec![
        Comment::reply(10, "c", 20),
        Comment::root(30, "a"),
        Comment::reply(20, "b", 30),
    ];

    let forest = ForestBuilder::new(BuildOrder::Topological)
        .build(comments)
        .unwrap();

    assert_eq!(ids_at_top(&forest), vec![30]);
    assert_eq!(child_ids(&forest, 30), vec![20]);
    assert_eq!(child_ids(&forest, 20), vec![10]);
}

// ============================================================
// Errors
// ============================================================

#[test]
fn given_cycle_when_building_topologically_then_corrupt_chain() {
    let comments = vec![
        Comment::root(1, "a"),
        Comment::reply(2, "b", 3),
        Comment::reply(3, "c", 2),
    ];

    let result = ForestBuilder::new(BuildOrder::Topological).build(comments);

    assert!(matches!(result, Err(DomainError::CorruptChain { .. })));
}

#[rstest]
#[case(BuildOrder::AsGiven)]
#[case(BuildOrder::ByParentId)]
fn given_self_parented_comment_when_building_then_unknown_parent(#[case] order: BuildOrder) {
    let comments = vec![Comment::root(1, "a"), Comment::reply(2, "me", 2)];

    let result = ForestBuilder::new(order).build(comments);

    assert!(matches!(result, Err(DomainError::UnknownParent { .. })));
}

#[rstest]
#[case(BuildOrder::AsGiven)]
#[case(BuildOrder::ByParentId)]
#[case(BuildOrder::Topological)]
fn given_dangling_parent_when_building_then_unknown_parent_names_it(#[case] order: BuildOrder) {
    let comments = vec![Comment::root(1, "a"), Comment::reply(2, "b", 99)];

    let result = ForestBuilder::new(order).build(comments);

    assert_eq!(
        result.unwrap_err(),
        DomainError::UnknownParent {
            node: Comment::reply(2, "b", 99)
        }
    );
}

#[rstest]
#[case(BuildOrder::AsGiven)]
#[case(BuildOrder::Topological)]
fn given_duplicate_id_when_building_then_duplicate_id(#[case] order: BuildOrder) {
    let comments = vec![Comment::root(1, "a"), Comment::root(1, "again")];

    let result = ForestBuilder::new(order).build(comments);

    assert_eq!(
        result.unwrap_err(),
        DomainError::DuplicateId {
            node: Comment::root(1, "again")
        }
    );
}

#[test]
fn given_comment_without_id_when_building_then_malformed_record() {
    let comments = vec![Comment::new(None, Some("unsaved"), None)];

    let result = build_forest(comments, true);

    assert!(matches!(result, Err(DomainError::MalformedRecord { .. })));
}

#[test]
fn given_empty_input_when_building_then_empty_forest() {
    let forest = build_forest(Vec::new(), false).unwrap();
    assert!(forest.is_empty());
    assert_eq!(forest.depth(), 0);
}
