use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Annotation, Beat, Snapshot, StepKind, TreeLayout};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Depth-first visiting order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    #[default]
    InOrder,
    PreOrder,
    PostOrder,
}

impl TraversalOrder {
    /// Parses a form value; anything unknown falls back to in-order
    pub fn from_choice(value: &str) -> Self {
        match value {
            "preorder" => TraversalOrder::PreOrder,
            "postorder" => TraversalOrder::PostOrder,
            _ => TraversalOrder::InOrder,
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalOrder::InOrder => f.write_str("in-order"),
            TraversalOrder::PreOrder => f.write_str("pre-order"),
            TraversalOrder::PostOrder => f.write_str("post-order"),
        }
    }
}

#[derive(Debug)]
struct Node {
    value: i32,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// Balanced tree over `start..=end`, rooted at the lower middle
fn balanced(start: i32, end: i32) -> Option<Box<Node>> {
    if start > end {
        return None;
    }
    let mid = (start + end) / 2;
    Some(Box::new(Node {
        value: mid,
        left: balanced(start, mid - 1),
        right: balanced(mid + 1, end),
    }))
}

fn collect(node: &Option<Box<Node>>, order: TraversalOrder, out: &mut Vec<i32>) {
    let Some(node) = node else {
        return;
    };
    if order == TraversalOrder::PreOrder {
        out.push(node.value);
    }
    collect(&node.left, order, out);
    if order == TraversalOrder::InOrder {
        out.push(node.value);
    }
    collect(&node.right, order, out);
    if order == TraversalOrder::PostOrder {
        out.push(node.value);
    }
}

fn snapshot(root: &Option<Box<Node>>, highlight: Option<i32>) -> Snapshot {
    fn place(
        node: &Option<Box<Node>>,
        parent: Option<i32>,
        depth: usize,
        bounds: (f64, f64),
        highlight: Option<i32>,
        layout: &mut TreeLayout,
    ) {
        if let Some(node) = node {
            let (left, right) = layout.place(
                node.value,
                parent,
                depth,
                bounds,
                Annotation::None,
                highlight == Some(node.value),
            );
            place(&node.left, Some(node.value), depth + 1, left, highlight, layout);
            place(&node.right, Some(node.value), depth + 1, right, highlight, layout);
        }
    }
    let mut layout = TreeLayout::new();
    place(root, None, 0, TreeLayout::root_bounds(), highlight, &mut layout);
    Snapshot::Tree(layout.finish())
}

/// Visits a balanced tree over `1..=size`, one step per node
pub async fn traverse(
    ctx: &mut ExecutionContext<'_>,
    size: usize,
    order: TraversalOrder,
) -> Result<Outcome, Cancelled> {
    let root = balanced(1, size as i32);
    let mut visits = Vec::with_capacity(size);
    collect(&root, order, &mut visits);

    for &value in &visits {
        ctx.narrate(
            StepKind::Visit,
            snapshot(&root, Some(value)),
            Beat::Full,
            format!("{} visit {}", order, value),
        )
        .await?;
    }
    Ok(Outcome::Traversed { order: visits })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryTreeTraversal;

#[async_trait]
impl Algorithm for BinaryTreeTraversal {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("binaryTreeTraversal")
    }

    fn name(&self) -> &'static str {
        "Binary Tree Traversals"
    }

    fn category(&self) -> Category {
        Category::Tree
    }

    fn description(&self) -> &'static str {
        "Demonstrates in-order, pre-order, and post-order traversals of a binary tree."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(n)", "O(h)", "O(n)", "O(n)", "O(n)")
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("treeSize", "Tree Size", 3, 15, 7),
            ParameterSpec::choice(
                "traversalType",
                "Traversal Type",
                &[("inorder", "In-order"), ("preorder", "Pre-order"), ("postorder", "Post-order")],
                "inorder",
            ),
            ParameterSpec::speed(),
        ]
    }

    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled> {
        ctx.checkpoint()?;
        let size = params.count_or("treeSize", 7);
        let order = TraversalOrder::from_choice(params.choice_or("traversalType", "inorder"));
        traverse(ctx, size, order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run_recorded;

    fn order(pairs: &[(&str, &str)]) -> Vec<i32> {
        match run_recorded(&BinaryTreeTraversal, pairs).0.unwrap() {
            Outcome::Traversed { order } => order,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_three_orders_over_seven_nodes() {
        assert_eq!(order(&[]), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(order(&[("traversalType", "preorder")]), vec![4, 2, 1, 3, 6, 5, 7]);
        assert_eq!(order(&[("traversalType", "postorder")]), vec![1, 3, 2, 5, 7, 6, 4]);
    }

    #[test]
    fn test_even_size_roots_at_lower_middle() {
        assert_eq!(order(&[("treeSize", "4"), ("traversalType", "preorder")]), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_unknown_type_falls_back_to_inorder() {
        assert_eq!(order(&[("treeSize", "3"), ("traversalType", "levelorder")]), vec![1, 2, 3]);
    }

    #[test]
    fn test_each_visit_highlights_one_node() {
        let (_, history) = run_recorded(&BinaryTreeTraversal, &[("treeSize", "5")]);
        assert_eq!(history.count_kind(StepKind::Visit), 5);
        for (step, expected) in history.steps().iter().zip(1..) {
            let view = step.snapshot.as_tree().unwrap();
            let lit: Vec<i32> = view.nodes.iter().filter(|n| n.highlighted).map(|n| n.value).collect();
            assert_eq!(lit, vec![expected]);
            assert_eq!(view.nodes.len(), 5);
        }
    }
}
