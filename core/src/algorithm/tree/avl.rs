//! AVL insertion with animated rotations
//!
//! Insertion is split into two observable phases. The value is first placed
//! as a leaf with heights refreshed along its path, which may leave an
//! ancestor with a balance factor of ±2. The path is then walked back up and
//! the deepest unbalanced ancestor is repaired with one of the four rotation
//! cases; every single rotation is reported as its own step.

use std::fmt;

use async_trait::async_trait;

use super::{insertion_parameters, shuffled_values, Side};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Annotation, Beat, Snapshot, StepKind, TreeLayout};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmId, Category, InvariantViolation, Outcome,
};
use crate::execution::context::{Cancelled, ExecutionContext};

type Link = Option<Box<AvlNode>>;

#[derive(Debug)]
struct AvlNode {
    value: i32,
    /// Height of the subtree rooted here; a leaf has height 1
    height: usize,
    left: Link,
    right: Link,
}

impl AvlNode {
    fn leaf(value: i32) -> Box<Self> {
        Box::new(Self { value, height: 1, left: None, right: None })
    }

    fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    fn balance(&self) -> i64 {
        height(&self.left) as i64 - height(&self.right) as i64
    }

    fn refresh(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// Which way a node turns; a right rotation lifts the left child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Left => f.write_str("left"),
            Turn::Right => f.write_str("right"),
        }
    }
}

/// The four imbalance cases, named by the path to the heavy grandchild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl Case {
    fn of(node: &AvlNode) -> Option<Case> {
        let balance = node.balance();
        if balance > 1 {
            let left = node.left.as_deref().map_or(0, AvlNode::balance);
            Some(if left >= 0 { Case::LeftLeft } else { Case::LeftRight })
        } else if balance < -1 {
            let right = node.right.as_deref().map_or(0, AvlNode::balance);
            Some(if right <= 0 { Case::RightRight } else { Case::RightLeft })
        } else {
            None
        }
    }

    /// Rotations to apply, each at the unbalanced node or one of its children
    fn plan(self) -> &'static [(Option<Side>, Turn)] {
        match self {
            Case::LeftLeft => &[(None, Turn::Right)],
            Case::RightRight => &[(None, Turn::Left)],
            Case::LeftRight => &[(Some(Side::Left), Turn::Left), (None, Turn::Right)],
            Case::RightLeft => &[(Some(Side::Right), Turn::Right), (None, Turn::Left)],
        }
    }
}

/// Follows `path` from `link`; `None` if it runs off the tree
fn link_at<'a>(link: &'a mut Link, path: &[Side]) -> Option<&'a mut Link> {
    let Some((&side, rest)) = path.split_first() else {
        return Some(link);
    };
    match link {
        Some(node) => link_at(node.child_mut(side), rest),
        None => None,
    }
}

/// Rotates the subtree in `link`, returning the value that moved down
fn rotate(link: &mut Link, turn: Turn) -> Option<i32> {
    let mut node = link.take()?;
    let lifted = match turn {
        Turn::Right => node.left.take(),
        Turn::Left => node.right.take(),
    };
    let Some(mut pivot) = lifted else {
        *link = Some(node);
        return None;
    };
    match turn {
        Turn::Right => {
            node.left = pivot.right.take();
            node.refresh();
            pivot.right = Some(node);
        }
        Turn::Left => {
            node.right = pivot.left.take();
            node.refresh();
            pivot.left = Some(node);
        }
    }
    pivot.refresh();
    let lowered = match turn {
        Turn::Right => pivot.right.as_ref().map(|n| n.value),
        Turn::Left => pivot.left.as_ref().map(|n| n.value),
    };
    *link = Some(pivot);
    lowered
}

/// Plain search tree insert; returns the path to the new leaf
fn insert_leaf(link: &mut Link, value: i32, path: &mut Vec<Side>) -> bool {
    let Some(node) = link else {
        *link = Some(AvlNode::leaf(value));
        return true;
    };
    let side = match value.cmp(&node.value) {
        std::cmp::Ordering::Less => Side::Left,
        std::cmp::Ordering::Greater => Side::Right,
        std::cmp::Ordering::Equal => return false,
    };
    path.push(side);
    let inserted = insert_leaf(node.child_mut(side), value, path);
    if inserted {
        node.refresh();
    }
    inserted
}

/// Height-balanced binary search tree
#[derive(Debug, Default)]
pub struct AvlTree {
    root: Link,
    len: usize,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn root_value(&self) -> Option<i32> {
        self.root.as_ref().map(|node| node.value)
    }

    /// Values in ascending order
    pub fn values(&self) -> Vec<i32> {
        fn walk(link: &Link, out: &mut Vec<i32>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(node.value);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// Inserts `value` and restores balance; false for a duplicate
    pub async fn insert(&mut self, ctx: &mut ExecutionContext<'_>, value: i32) -> Result<bool, Cancelled> {
        ctx.checkpoint()?;
        let mut path = Vec::new();
        if !insert_leaf(&mut self.root, value, &mut path) {
            return Ok(false);
        }
        self.len += 1;
        ctx.narrate(StepKind::Insert, self.snapshot(Some(value)), Beat::Full, format!("insert {}", value))
            .await?;

        for depth in (0..path.len()).rev() {
            let ancestor = &path[..depth];
            let Some(case) = self.refresh_at(ancestor) else {
                continue;
            };
            for &(child, turn) in case.plan() {
                let mut at = ancestor.to_vec();
                at.extend(child);
                let lowered = link_at(&mut self.root, &at).and_then(|link| rotate(link, turn));
                if let Some(lowered) = lowered {
                    ctx.narrate(
                        StepKind::Rotate,
                        self.snapshot(Some(lowered)),
                        Beat::Full,
                        format!("{} rotation at {}", turn, lowered),
                    )
                    .await?;
                }
            }
        }
        Ok(true)
    }

    /// Recomputes the height of the node at `path` and reports its imbalance
    fn refresh_at(&mut self, path: &[Side]) -> Option<Case> {
        let node = link_at(&mut self.root, path)?.as_deref_mut()?;
        node.refresh();
        Case::of(node)
    }

    pub fn snapshot(&self, highlight: Option<i32>) -> Snapshot {
        fn place(
            link: &Link,
            parent: Option<i32>,
            depth: usize,
            bounds: (f64, f64),
            highlight: Option<i32>,
            layout: &mut TreeLayout,
        ) {
            if let Some(node) = link {
                let (left, right) = layout.place(
                    node.value,
                    parent,
                    depth,
                    bounds,
                    Annotation::Height(node.height),
                    highlight == Some(node.value),
                );
                place(&node.left, Some(node.value), depth + 1, left, highlight, layout);
                place(&node.right, Some(node.value), depth + 1, right, highlight, layout);
            }
        }
        let mut layout = TreeLayout::new();
        place(&self.root, None, 0, TreeLayout::root_bounds(), highlight, &mut layout);
        Snapshot::Tree(layout.finish())
    }

    /// Checks ordering, cached heights and balance factors
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        fn check(link: &Link, low: Option<i32>, high: Option<i32>) -> Result<usize, InvariantViolation> {
            let Some(node) = link else {
                return Ok(0);
            };
            if low.is_some_and(|low| node.value <= low) || high.is_some_and(|high| node.value >= high) {
                return Err(InvariantViolation::OutOfOrder { value: node.value });
            }
            let left = check(&node.left, low, Some(node.value))?;
            let right = check(&node.right, Some(node.value), high)?;
            let actual = 1 + left.max(right);
            if node.height != actual {
                return Err(InvariantViolation::StaleHeight {
                    value: node.value,
                    stored: node.height,
                    actual,
                });
            }
            let balance = left as i64 - right as i64;
            if balance.abs() > 1 {
                return Err(InvariantViolation::Unbalanced { value: node.value, balance });
            }
            Ok(actual)
        }
        check(&self.root, None, None).map(|_| ())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AvlTreeOperations;

#[async_trait]
impl Algorithm for AvlTreeOperations {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("avlTree")
    }

    fn name(&self) -> &'static str {
        "AVL Tree Operations"
    }

    fn category(&self) -> Category {
        Category::Tree
    }

    fn description(&self) -> &'static str {
        "Demonstrates AVL tree operations including insertions and rotations to maintain balance."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(log n)", "O(n)", "O(log n)", "O(log n)", "O(log n)")
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        insertion_parameters()
    }

    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled> {
        ctx.checkpoint()?;
        let values = shuffled_values(ctx, params);
        let mut tree = AvlTree::new();
        for value in values {
            tree.insert(ctx, value).await?;
        }
        debug_assert!(tree.validate().is_ok());
        Ok(Outcome::TreeBuilt {
            inserted: tree.len(),
            height: tree.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::history::ExecutionHistory;
    use crate::test_support::{context, run_recorded};
    use futures::executor::block_on;
    use quickcheck::quickcheck;

    fn build(values: &[i32]) -> (AvlTree, ExecutionHistory) {
        let mut history = ExecutionHistory::new();
        let mut tree = AvlTree::new();
        {
            let mut ctx = context(&mut history);
            for &value in values {
                block_on(tree.insert(&mut ctx, value)).unwrap();
            }
        }
        (tree, history)
    }

    fn notes(history: &ExecutionHistory) -> Vec<String> {
        history
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Rotate)
            .filter_map(|s| s.note.clone())
            .collect()
    }

    #[test]
    fn test_left_left_case_rotates_right() {
        let (tree, history) = build(&[3, 2, 1]);
        assert_eq!(tree.root_value(), Some(2));
        assert_eq!(tree.height(), 2);
        assert_eq!(notes(&history), vec!["right rotation at 3"]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_right_right_case_rotates_left() {
        let (tree, history) = build(&[1, 2, 3]);
        assert_eq!(tree.root_value(), Some(2));
        assert_eq!(notes(&history), vec!["left rotation at 1"]);
    }

    #[test]
    fn test_double_rotations() {
        let (tree, history) = build(&[3, 1, 2]);
        assert_eq!(tree.root_value(), Some(2));
        assert_eq!(notes(&history), vec!["left rotation at 1", "right rotation at 3"]);

        let (tree, history) = build(&[1, 3, 2]);
        assert_eq!(tree.root_value(), Some(2));
        assert_eq!(notes(&history), vec!["right rotation at 3", "left rotation at 1"]);
    }

    #[test]
    fn test_insert_step_shows_leaf_before_rebalancing() {
        let (_, history) = build(&[3, 2, 1]);
        let insert = history.last_of_kind(StepKind::Insert).unwrap();
        let view = insert.snapshot.as_tree().unwrap();
        // still a chain, root carries height 3
        assert_eq!(view.root().map(|n| n.value), Some(3));
        assert_eq!(view.root().map(|n| n.annotation), Some(Annotation::Height(3)));
        assert!(view.node(1).unwrap().highlighted);
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let mut history = ExecutionHistory::new();
        let mut ctx = context(&mut history);
        let mut tree = AvlTree::new();
        assert!(block_on(tree.insert(&mut ctx, 4)).unwrap());
        assert!(!block_on(tree.insert(&mut ctx, 4)).unwrap());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_ascending_run_stays_logarithmic() {
        let values: Vec<i32> = (1..=15).collect();
        let (tree, _) = build(&values);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.values(), values);
    }

    #[test]
    fn test_registered_run_builds_full_tree() {
        let (outcome, history) = run_recorded(&AvlTreeOperations, &[("nodeCount", "12")]);
        match outcome.unwrap() {
            Outcome::TreeBuilt { inserted, height } => {
                assert_eq!(inserted, 12);
                assert!(height <= 5);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(history.count_kind(StepKind::Insert), 12);
    }

    quickcheck! {
        fn prop_any_insertion_order_stays_balanced(values: Vec<i16>) -> bool {
            let values: Vec<i32> = values.into_iter().map(i32::from).collect();
            let (tree, _) = build(&values);
            let mut expected = values;
            expected.sort_unstable();
            expected.dedup();
            tree.validate().is_ok() && tree.values() == expected
        }
    }
}
