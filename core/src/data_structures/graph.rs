//! Weighted undirected graph with drawable vertex positions
//!
//! Vertices are laid out on a circle; edges are stored once, with canonical
//! endpoint order (`from < to`), in the order they were generated. That order
//! is the enumeration order Prim's scan relies on for tie-breaking.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::state::{EdgeState, EdgeView, GraphView, VertexView};
use crate::algorithm::traits::AlgorithmError;

/// Radius of the vertex circle
pub const LAYOUT_RADIUS: f64 = 150.0;
/// Centre of the vertex circle on both axes
pub const LAYOUT_CENTER: f64 = 200.0;

/// Inclusive bounds of generated edge weights
pub const MIN_WEIGHT: u32 = 10;
pub const MAX_WEIGHT: u32 = 99;

/// 2D position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: usize,
    pub position: Position,
}

/// Undirected weighted edge with `from < to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub from: usize,
    pub to: usize,
    pub weight: u32,
}

impl WeightedEdge {
    /// Orders the endpoints canonically
    pub fn new(a: usize, b: usize, weight: u32) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
            weight,
        }
    }

    pub fn touches(&self, vertex: usize) -> bool {
        self.from == vertex || self.to == vertex
    }

    /// The endpoint opposite `vertex`
    pub fn other(&self, vertex: usize) -> usize {
        if self.from == vertex {
            self.to
        } else {
            self.from
        }
    }

    pub fn element_id(&self) -> String {
        format!("edge-{}-{}", self.from, self.to)
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<WeightedEdge>,
    visited: Vec<bool>,
    in_tree: Vec<bool>,
}

impl Graph {
    /// `n` isolated vertices evenly spaced on a circle
    pub fn circular(n: usize) -> Self {
        let vertices = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                Vertex {
                    id: i,
                    position: Position::new(
                        angle.cos() * LAYOUT_RADIUS + LAYOUT_CENTER,
                        angle.sin() * LAYOUT_RADIUS + LAYOUT_CENTER,
                    ),
                }
            })
            .collect();
        Self {
            vertices,
            edges: Vec::new(),
            visited: vec![false; n],
            in_tree: Vec::new(),
        }
    }

    /// Each pair `i < j` gets an edge with probability `density` percent
    pub fn random<R: Rng + ?Sized>(n: usize, density: u32, rng: &mut R) -> Self {
        let mut graph = Self::circular(n);
        let density = f64::from(density.min(100));
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.gen::<f64>() * 100.0 < density {
                    let weight = rng.gen_range(MIN_WEIGHT..=MAX_WEIGHT);
                    graph.push_edge(WeightedEdge::new(i, j, weight));
                }
            }
        }
        graph
    }

    pub fn add_edge(&mut self, a: usize, b: usize, weight: u32) -> Result<(), AlgorithmError> {
        let invalid = |reason: String| AlgorithmError::InvalidParameter {
            name: format!("edge {}-{}", a, b),
            reason,
        };
        if a >= self.vertices.len() || b >= self.vertices.len() {
            return Err(invalid(format!("graph has {} vertices", self.vertices.len())));
        }
        if a == b {
            return Err(invalid("self loops are not allowed".to_owned()));
        }
        let edge = WeightedEdge::new(a, b, weight);
        if self.edges.iter().any(|e| e.from == edge.from && e.to == edge.to) {
            return Err(invalid("edge already present".to_owned()));
        }
        self.push_edge(edge);
        Ok(())
    }

    fn push_edge(&mut self, edge: WeightedEdge) {
        self.edges.push(edge);
        self.in_tree.push(false);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    pub fn is_visited(&self, vertex: usize) -> bool {
        self.visited.get(vertex).copied().unwrap_or(false)
    }

    pub fn visit(&mut self, vertex: usize) {
        if let Some(flag) = self.visited.get_mut(vertex) {
            *flag = true;
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    pub fn mark_tree_edge(&mut self, index: usize) {
        if let Some(flag) = self.in_tree.get_mut(index) {
            *flag = true;
        }
    }

    /// Whether edge `index` has exactly one visited endpoint
    pub fn crosses_cut(&self, index: usize) -> bool {
        self.edges
            .get(index)
            .is_some_and(|edge| self.is_visited(edge.from) != self.is_visited(edge.to))
    }

    /// Drawable view; `candidate` is the edge currently highlighted
    pub fn snapshot(&self, candidate: Option<usize>) -> GraphView {
        let vertices = self
            .vertices
            .iter()
            .map(|v| VertexView {
                id: v.id,
                x: v.position.x,
                y: v.position.y,
                visited: self.is_visited(v.id),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, edge)| EdgeView {
                id: edge.element_id(),
                from: edge.from,
                to: edge.to,
                weight: edge.weight,
                state: if self.in_tree.get(i).copied().unwrap_or(false) {
                    EdgeState::Tree
                } else if candidate == Some(i) {
                    EdgeState::Candidate
                } else {
                    EdgeState::Idle
                },
            })
            .collect();
        GraphView { vertices, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_circular_layout() {
        let graph = Graph::circular(4);
        let first = graph.vertices()[0].position;
        assert!((first.x - 350.0).abs() < 1e-9);
        assert!((first.y - 200.0).abs() < 1e-9);
        let opposite = graph.vertices()[2].position;
        assert!((first.distance_to(&opposite) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_edges_are_canonical() {
        let edge = WeightedEdge::new(5, 2, 40);
        assert_eq!((edge.from, edge.to), (2, 5));
        assert_eq!(edge.other(2), 5);
        assert_eq!(edge.element_id(), "edge-2-5");
    }

    #[test]
    fn test_full_density_is_complete() {
        let mut rng = StdRng::seed_from_u64(5);
        let graph = Graph::random(6, 100, &mut rng);
        assert_eq!(graph.edges().len(), 15);
        assert!(graph
            .edges()
            .iter()
            .all(|e| e.from < e.to && (MIN_WEIGHT..=MAX_WEIGHT).contains(&e.weight)));
    }

    #[test]
    fn test_zero_density_has_no_edges() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(Graph::random(6, 0, &mut rng).edges().is_empty());
    }

    #[test]
    fn test_add_edge_rejects_bad_endpoints() {
        let mut graph = Graph::circular(3);
        assert!(graph.add_edge(0, 1, 10).is_ok());
        assert!(graph.add_edge(1, 0, 12).is_err());
        assert!(graph.add_edge(2, 2, 10).is_err());
        assert!(graph.add_edge(0, 3, 10).is_err());
    }

    #[test]
    fn test_cut_and_snapshot() {
        let mut graph = Graph::circular(3);
        graph.add_edge(0, 1, 10).unwrap();
        graph.add_edge(1, 2, 20).unwrap();
        graph.visit(0);
        assert!(graph.crosses_cut(0));
        assert!(!graph.crosses_cut(1));

        graph.mark_tree_edge(0);
        let view = graph.snapshot(Some(1));
        assert_eq!(view.edges[0].state, EdgeState::Tree);
        assert_eq!(view.edges[1].state, EdgeState::Candidate);
        assert!(view.vertices[0].visited);
    }
}
