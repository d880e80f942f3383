//! Minimum Spanning Tree
//!
//! Prim's algorithm grown from vertex 0 over a random weighted graph. Each
//! round scans the edge list for the lightest edge crossing the cut between
//! visited and unvisited vertices; the scan itself is animated, so the
//! candidates are examined in list order and the first minimum wins ties.
//!
//! # Correctness Guarantees
//!
//! By the cut property the lightest crossing edge is always safe, so the
//! accepted edges form a minimum spanning tree whenever the graph is
//! connected. If some round finds no crossing edge the graph is not connected
//! and the run ends with [`Outcome::Disconnected`].
//!
//! Copyright (c) 2025 Mohammad Atashi. All rights reserved.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Beat, Snapshot, StepKind};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmId, Category, InvariantViolation, Outcome,
};
use crate::data_structures::graph::{Graph, WeightedEdge};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Union-Find data structure with path compression and union by rank
///
/// Used to check spanning trees for cycles.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    /// Rank (approximate depth) of each tree
    rank: Vec<usize>,
    num_components: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            num_components: n,
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Merges the sets of x and y; false if they were already joined
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }

        self.num_components -= 1;
        true
    }

    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    pub fn components(&self) -> usize {
        self.num_components
    }
}

/// Accepted edges in the order Prim's algorithm took them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningTree {
    pub edges: Vec<WeightedEdge>,
    pub total_weight: u32,
}

impl SpanningTree {
    fn push(&mut self, edge: WeightedEdge) {
        self.total_weight += edge.weight;
        self.edges.push(edge);
    }

    /// Checks the tree spans `vertex_count` vertices with no cycle
    ///
    /// `|V| - 1` acyclic edges over `|V|` vertices are connected, so no
    /// separate reachability pass is needed.
    pub fn validate(&self, vertex_count: usize) -> Result<(), InvariantViolation> {
        let expected = vertex_count.saturating_sub(1);
        if self.edges.len() != expected {
            return Err(InvariantViolation::EdgeCount { expected, actual: self.edges.len() });
        }
        let mut sets = UnionFind::new(vertex_count);
        for edge in &self.edges {
            if edge.from >= vertex_count || edge.to >= vertex_count {
                return Err(InvariantViolation::UnknownVertex { from: edge.from, to: edge.to });
            }
            if !sets.union(edge.from, edge.to) {
                return Err(InvariantViolation::Cycle { from: edge.from, to: edge.to });
            }
        }
        Ok(())
    }
}

impl From<SpanningTree> for Outcome {
    fn from(tree: SpanningTree) -> Self {
        Outcome::SpanningTree {
            edges: tree.edges,
            total_weight: tree.total_weight,
        }
    }
}

/// Lightest edge crossing the cut, emitting a candidate step whenever the
/// running minimum improves
async fn lightest_crossing(
    ctx: &mut ExecutionContext<'_>,
    graph: &Graph,
) -> Result<Option<usize>, Cancelled> {
    let mut best: Option<(usize, u32)> = None;
    for (index, edge) in graph.edges().iter().enumerate() {
        if !graph.crosses_cut(index) {
            continue;
        }
        if best.map_or(true, |(_, weight)| edge.weight < weight) {
            best = Some((index, edge.weight));
            ctx.narrate(
                StepKind::CandidateEdge,
                Snapshot::Graph(graph.snapshot(Some(index))),
                Beat::Half,
                format!("candidate {} (weight {})", edge.element_id(), edge.weight),
            )
            .await?;
        }
    }
    Ok(best.map(|(index, _)| index))
}

pub async fn prim(ctx: &mut ExecutionContext<'_>, graph: &mut Graph) -> Result<Outcome, Cancelled> {
    let vertices = graph.vertex_count();
    let mut tree = SpanningTree::default();
    if vertices == 0 {
        return Ok(tree.into());
    }
    graph.visit(0);

    while graph.visited_count() < vertices {
        ctx.checkpoint()?;
        let Some(index) = lightest_crossing(ctx, graph).await? else {
            return Ok(Outcome::Disconnected {
                visited: graph.visited_count(),
                vertices,
            });
        };

        let edge = graph.edges()[index];
        let joined = if graph.is_visited(edge.from) { edge.to } else { edge.from };
        graph.mark_tree_edge(index);
        graph.visit(joined);
        tree.push(edge);
        ctx.emit(StepKind::TreeEdge, Snapshot::Graph(graph.snapshot(None)), Beat::Full)
            .await?;
    }

    debug_assert!(tree.validate(vertices).is_ok());
    Ok(tree.into())
}

/// Prim's minimum spanning tree over a random circular graph
#[derive(Debug, Default, Clone, Copy)]
pub struct Prim;

#[async_trait]
impl Algorithm for Prim {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("prim")
    }

    fn name(&self) -> &'static str {
        "Prim's Algorithm"
    }

    fn category(&self) -> Category {
        Category::Graph
    }

    fn description(&self) -> &'static str {
        "Finds a minimum spanning tree in a weighted, undirected graph."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V·E)", "O(V + E)", "O(V·E)", "O(V·E)", "O(V·E)")
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("gridSize", "Number of Vertices", 5, 15, 8),
            ParameterSpec::number("density", "Edge Density (%)", 20, 80, 30),
            ParameterSpec::speed(),
        ]
    }

    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled> {
        ctx.checkpoint()?;
        let vertices = params.count_or("gridSize", 8);
        let density = u32::try_from(params.number_or("density", 30)).unwrap_or(30);
        let mut graph = Graph::random(vertices, density, ctx.rng());
        prim(ctx, &mut graph).await
    }
}
