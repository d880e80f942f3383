//! Binary tree algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>
//!
//! Self-balancing insertion (AVL, Red-Black) and the three depth-first
//! traversals. Each run builds its tree from scratch; snapshots are laid out
//! with [`TreeLayout`](crate::algorithm::state::TreeLayout).

pub mod avl;
pub mod red_black;
pub mod traversal;

use std::fmt;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::execution::context::ExecutionContext;

pub use self::avl::{AvlTree, AvlTreeOperations};
pub use self::red_black::{RedBlackTree, RedBlackTreeOperations};
pub use self::traversal::{BinaryTreeTraversal, TraversalOrder};

/// Red-Black node colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Black,
}

/// Child direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

pub(crate) fn insertion_parameters() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::number("nodeCount", "Number of Nodes", 3, 15, 8),
        ParameterSpec::speed(),
    ]
}

/// `1..=nodeCount` in random order
pub(crate) fn shuffled_values(ctx: &mut ExecutionContext<'_>, params: &ResolvedParameters) -> Vec<i32> {
    let count = params.count_or("nodeCount", 8) as i32;
    let mut values: Vec<i32> = (1..=count).collect();
    values.shuffle(ctx.rng());
    values
}
