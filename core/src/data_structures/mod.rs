//! Run-scoped structures the algorithms animate

pub mod graph;
pub mod grid;

pub use self::graph::{Graph, Position, Vertex, WeightedEdge};
pub use self::grid::{Cell, Grid, GridCell};
