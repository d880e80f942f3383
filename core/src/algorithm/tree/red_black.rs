//! Red-Black insertion with the classic fix-up loop
//!
//! Nodes live in an arena and refer to each other by index, parent links
//! included, so rotations only rewrite indices.

use std::cmp::Ordering;

use async_trait::async_trait;

use super::{insertion_parameters, shuffled_values, Color, Side};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Annotation, Beat, Snapshot, StepKind, TreeLayout};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmId, Category, InvariantViolation, Outcome,
};
use crate::execution::context::{Cancelled, ExecutionContext};

#[derive(Debug, Clone)]
struct RbNode {
    value: i32,
    color: Color,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
}

#[derive(Debug, Default)]
pub struct RedBlackTree {
    nodes: Vec<RbNode>,
    root: Option<usize>,
}

impl RedBlackTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_value(&self) -> Option<i32> {
        self.root.map(|i| self.nodes[i].value)
    }

    pub fn color_of(&self, value: i32) -> Option<Color> {
        self.nodes.iter().find(|n| n.value == value).map(|n| n.color)
    }

    pub fn height(&self) -> usize {
        fn depth(tree: &RedBlackTree, node: Option<usize>) -> usize {
            node.map_or(0, |i| {
                1 + depth(tree, tree.nodes[i].left).max(depth(tree, tree.nodes[i].right))
            })
        }
        depth(self, self.root)
    }

    /// Values in ascending order
    pub fn values(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        while cursor.is_some() || !stack.is_empty() {
            while let Some(i) = cursor {
                stack.push(i);
                cursor = self.nodes[i].left;
            }
            if let Some(i) = stack.pop() {
                out.push(self.nodes[i].value);
                cursor = self.nodes[i].right;
            }
        }
        out
    }

    /// Missing children count as black leaves
    fn color(&self, node: Option<usize>) -> Color {
        node.map_or(Color::Black, |i| self.nodes[i].color)
    }

    fn child(&self, node: usize, side: Side) -> Option<usize> {
        match side {
            Side::Left => self.nodes[node].left,
            Side::Right => self.nodes[node].right,
        }
    }

    fn set_child(&mut self, node: usize, side: Side, child: Option<usize>) {
        match side {
            Side::Left => self.nodes[node].left = child,
            Side::Right => self.nodes[node].right = child,
        }
        if let Some(c) = child {
            self.nodes[c].parent = Some(node);
        }
    }

    /// Which child of `parent` the node is
    fn side_under(&self, parent: usize, node: usize) -> Side {
        if self.nodes[parent].left == Some(node) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Turns `node` towards `turn`; a left rotation lifts the right child
    fn rotate(&mut self, node: usize, turn: Side) {
        let lifted_side = turn.opposite();
        let Some(lifted) = self.child(node, lifted_side) else {
            return;
        };
        let inner = self.child(lifted, turn);
        self.set_child(node, lifted_side, inner);

        match self.nodes[node].parent {
            Some(parent) => {
                let side = self.side_under(parent, node);
                self.set_child(parent, side, Some(lifted));
            }
            None => {
                self.root = Some(lifted);
                self.nodes[lifted].parent = None;
            }
        }
        self.set_child(lifted, turn, Some(node));
    }

    /// Inserts `value` red and repairs the colouring; false for a duplicate
    pub async fn insert(&mut self, ctx: &mut ExecutionContext<'_>, value: i32) -> Result<bool, Cancelled> {
        ctx.checkpoint()?;
        let mut parent = None;
        let mut side = Side::Left;
        let mut cursor = self.root;
        while let Some(i) = cursor {
            parent = Some(i);
            side = match value.cmp(&self.nodes[i].value) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok(false),
            };
            cursor = self.child(i, side);
        }

        let node = self.nodes.len();
        self.nodes.push(RbNode {
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        });
        match parent {
            Some(p) => self.set_child(p, side, Some(node)),
            None => self.root = Some(node),
        }
        ctx.narrate(StepKind::Insert, self.snapshot(Some(value)), Beat::Full, format!("insert {}", value))
            .await?;

        self.fix_insert(ctx, node).await?;
        Ok(true)
    }

    async fn fix_insert(&mut self, ctx: &mut ExecutionContext<'_>, mut node: usize) -> Result<(), Cancelled> {
        while let Some(parent) = self.nodes[node].parent.filter(|&p| self.nodes[p].color == Color::Red) {
            ctx.checkpoint()?;
            let Some(grand) = self.nodes[parent].parent else {
                break;
            };
            let side = self.side_under(grand, parent);
            let uncle = self.child(grand, side.opposite());

            if self.color(uncle) == Color::Red {
                self.nodes[parent].color = Color::Black;
                if let Some(u) = uncle {
                    self.nodes[u].color = Color::Black;
                }
                self.nodes[grand].color = Color::Red;
                let note = format!("recolor around {}", self.nodes[grand].value);
                ctx.narrate(StepKind::Recolor, self.snapshot(Some(self.nodes[grand].value)), Beat::Full, note)
                    .await?;
                node = grand;
                continue;
            }

            // inner grandchild: turn it into the outer case first
            if self.child(parent, side.opposite()) == Some(node) {
                node = parent;
                self.rotate(node, side);
                self.announce_rotation(ctx, node, side).await?;
            }

            let Some(parent) = self.nodes[node].parent else {
                break;
            };
            let Some(grand) = self.nodes[parent].parent else {
                break;
            };
            self.nodes[parent].color = Color::Black;
            self.nodes[grand].color = Color::Red;
            let note = format!("recolor {} black and {} red", self.nodes[parent].value, self.nodes[grand].value);
            ctx.narrate(StepKind::Recolor, self.snapshot(Some(self.nodes[parent].value)), Beat::Full, note)
                .await?;
            self.rotate(grand, side.opposite());
            self.announce_rotation(ctx, grand, side.opposite()).await?;
        }

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
        ctx.emit(StepKind::FixedUp, self.snapshot(None), Beat::Full).await
    }

    async fn announce_rotation(
        &self,
        ctx: &mut ExecutionContext<'_>,
        lowered: usize,
        turn: Side,
    ) -> Result<(), Cancelled> {
        let value = self.nodes[lowered].value;
        ctx.narrate(
            StepKind::Rotate,
            self.snapshot(Some(value)),
            Beat::Full,
            format!("{} rotation at {}", turn, value),
        )
        .await
    }

    pub fn snapshot(&self, highlight: Option<i32>) -> Snapshot {
        fn place(
            tree: &RedBlackTree,
            node: Option<usize>,
            depth: usize,
            bounds: (f64, f64),
            highlight: Option<i32>,
            layout: &mut TreeLayout,
        ) {
            let Some(i) = node else {
                return;
            };
            let n = &tree.nodes[i];
            let parent = n.parent.map(|p| tree.nodes[p].value);
            let (left, right) = layout.place(
                n.value,
                parent,
                depth,
                bounds,
                Annotation::Color(n.color),
                highlight == Some(n.value),
            );
            place(tree, n.left, depth + 1, left, highlight, layout);
            place(tree, n.right, depth + 1, right, highlight, layout);
        }
        let mut layout = TreeLayout::new();
        place(self, self.root, 0, TreeLayout::root_bounds(), highlight, &mut layout);
        Snapshot::Tree(layout.finish())
    }

    /// Checks every Red-Black property and returns the black height
    ///
    /// The black height counts black nodes on any root-to-leaf path, not
    /// counting the empty leaves.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        if self.color(self.root) == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }
        self.check(self.root, None, None, None)
    }

    fn check(
        &self,
        node: Option<usize>,
        parent: Option<usize>,
        low: Option<i32>,
        high: Option<i32>,
    ) -> Result<usize, InvariantViolation> {
        let Some(i) = node else {
            return Ok(0);
        };
        let n = &self.nodes[i];
        if n.parent != parent {
            return Err(InvariantViolation::ParentLink { value: n.value });
        }
        if low.is_some_and(|low| n.value <= low) || high.is_some_and(|high| n.value >= high) {
            return Err(InvariantViolation::OutOfOrder { value: n.value });
        }
        if n.color == Color::Red && (self.color(n.left) == Color::Red || self.color(n.right) == Color::Red) {
            return Err(InvariantViolation::RedRed { value: n.value });
        }
        let left = self.check(n.left, Some(i), low, Some(n.value))?;
        let right = self.check(n.right, Some(i), Some(n.value), high)?;
        if left != right {
            return Err(InvariantViolation::BlackHeight { value: n.value, left, right });
        }
        Ok(left + usize::from(n.color == Color::Black))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RedBlackTreeOperations;

#[async_trait]
impl Algorithm for RedBlackTreeOperations {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("redBlackTree")
    }

    fn name(&self) -> &'static str {
        "Red-Black Tree Operations"
    }

    fn category(&self) -> Category {
        Category::Tree
    }

    fn description(&self) -> &'static str {
        "Demonstrates Red-Black tree operations including insertions and color adjustments to maintain balance."
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
        let mut tree = RedBlackTree::new();
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
