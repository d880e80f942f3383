//! Core algorithm trait definitions for the algorithm engine
//!
//! This module establishes the trait every registered algorithm implements,
//! together with the identifier, error and outcome types shared by the
//! registry, the execution layer and the hosts.
//!
//! # Key Design Principles
//! - An algorithm is stateless metadata plus an async `run` routine
//! - All run state is created fresh inside `run` and dropped at its end
//! - Cancellation travels as `Err(Cancelled)` so `?` unwinds at any checkpoint
//! - Exhaustion ("no path", "disconnected") is an ordinary `Outcome`

use std::fmt::{self, Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::registry::AlgorithmDescriptor;
use crate::data_structures::graph::WeightedEdge;
use crate::data_structures::grid::Cell;
use crate::execution::context::{Cancelled, ExecutionContext};

/// Universal algorithm identifier for registry dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Menu grouping of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sorting,
    Searching,
    PathFinding,
    Graph,
    Tree,
}

/// Comprehensive error types for engine operations
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Algorithm registered twice: {0}")]
    DuplicateAlgorithm(AlgorithmId),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Execution error: {0}")]
    Execution(String),
}

/// Broken structural property found by a `validate()` pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("node {value} violates search order")]
    OutOfOrder { value: i32 },

    #[error("node {value} has balance factor {balance}")]
    Unbalanced { value: i32, balance: i64 },

    #[error("node {value} caches height {stored}, actual {actual}")]
    StaleHeight { value: i32, stored: usize, actual: usize },

    #[error("root is red")]
    RedRoot,

    #[error("red node {value} has a red child")]
    RedRed { value: i32 },

    #[error("node {value} has black heights {left} and {right}")]
    BlackHeight { value: i32, left: usize, right: usize },

    #[error("node {value} has a wrong parent link")]
    ParentLink { value: i32 },

    #[error("spanning tree has {actual} edges, expected {expected}")]
    EdgeCount { expected: usize, actual: usize },

    #[error("edge {from}-{to} closes a cycle")]
    Cycle { from: usize, to: usize },

    #[error("edge {from}-{to} references a missing vertex")]
    UnknownVertex { from: usize, to: usize },
}

/// Algorithm complexity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
    pub best_case: String,
    pub average_case: String,
    pub worst_case: String,
}

impl AlgorithmComplexity {
    pub fn new(time: &str, space: &str, best: &str, average: &str, worst: &str) -> Self {
        Self {
            time_complexity: time.to_owned(),
            space_complexity: space.to_owned(),
            best_case: best.to_owned(),
            average_case: average.to_owned(),
            worst_case: worst.to_owned(),
        }
    }
}

/// Terminal result of a run that was not cancelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The array ended in ascending order
    Sorted { values: Vec<i32> },

    /// The target was located at `index`
    Found { index: usize, value: i32 },

    /// The search window closed (`left > right`) without a hit
    NotFound { target: i32, left: isize, right: isize },

    /// A route from start to end, both endpoints included
    PathFound { path: Vec<Cell> },

    /// The frontier ran dry before the end cell was reached
    NoPath { explored: usize },

    /// Every vertex joined the tree
    SpanningTree { edges: Vec<WeightedEdge>, total_weight: u32 },

    /// No edge crossed the cut while vertices were still outside it
    Disconnected { visited: usize, vertices: usize },

    /// All values were inserted into a balanced tree
    TreeBuilt { inserted: usize, height: usize },

    /// Values in the order the traversal reached them
    Traversed { order: Vec<i32> },
}

impl Outcome {
    /// Number of moves on a found path
    pub fn hops(&self) -> Option<usize> {
        match self {
            Outcome::PathFound { path } => Some(path.len().saturating_sub(1)),
            _ => None,
        }
    }

    /// Short human readable line for status bars and logs
    pub fn summary(&self) -> String {
        match self {
            Outcome::Sorted { values } => format!("Sorted {} values", values.len()),
            Outcome::Found { index, value } => format!("Found {} at index {}", value, index),
            Outcome::NotFound { target, .. } => format!("{} is not in the array", target),
            Outcome::PathFound { path } => {
                format!("Path found successfully! ({} hops)", path.len().saturating_sub(1))
            }
            Outcome::NoPath { .. } => "No path could be found.".to_owned(),
            Outcome::SpanningTree { edges, total_weight } => format!(
                "Minimum spanning tree found successfully! ({} edges, weight {})",
                edges.len(),
                total_weight
            ),
            Outcome::Disconnected { .. } => {
                "Could not find spanning tree - graph might be disconnected.".to_owned()
            }
            Outcome::TreeBuilt { inserted, height } => {
                format!("Tree construction completed! ({} nodes, height {})", inserted, height)
            }
            Outcome::Traversed { order } => format!(
                "Traversal completed: {}",
                order.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
            ),
        }
    }
}

/// Main algorithm trait
///
/// # Invariants
/// - `id` is unique within a registry
/// - `run` owns every piece of state it mutates; nothing survives the call
/// - `run` polls the context at every loop head and returns `Err(Cancelled)`
///   promptly once the token is signalled
#[async_trait]
pub trait Algorithm: Debug + Send + Sync {
    /// Returns the algorithm's stable identifier
    fn id(&self) -> AlgorithmId;

    /// Returns the algorithm's built-in display name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category
    fn category(&self) -> Category;

    /// Returns the algorithm's built-in one-line description
    fn description(&self) -> &'static str;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns the declared parameters in form order
    fn parameters(&self) -> Vec<ParameterSpec>;

    /// Builds fresh state from `params` and animates the algorithm over it
    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled>;

    /// Serializable metadata view handed to form generators and menus
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor {
            id: self.id(),
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            category: self.category(),
            complexity: self.complexity(),
            parameters: self.parameters(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_id_uniqueness() {
        let id1 = AlgorithmId::new("astar");
        let id2 = AlgorithmId::new("dijkstra");
        let id3 = AlgorithmId::new("astar");

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(id1.to_string(), "astar");
    }

    #[test]
    fn test_hops_only_for_paths() {
        let path = Outcome::PathFound {
            path: vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)],
        };
        assert_eq!(path.hops(), Some(2));
        assert_eq!(Outcome::NoPath { explored: 3 }.hops(), None);
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(Outcome::Found { index: 1, value: 10 }).unwrap();
        assert_eq!(json["kind"], "found");
        assert_eq!(json["index"], 1);
    }

    #[test]
    fn test_summary_mentions_failure_modes() {
        assert_eq!(Outcome::NoPath { explored: 0 }.summary(), "No path could be found.");
        assert!(Outcome::Disconnected { visited: 1, vertices: 5 }
            .summary()
            .contains("disconnected"));
    }
}
