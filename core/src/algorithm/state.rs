//! Step and snapshot representation for visualization hosts
//!
//! Every observable action of a running algorithm is reported as a [`Step`]:
//! what happened ([`StepKind`]), a self-contained copy of the structure at
//! that moment ([`Snapshot`]), and how long the host should wait before the
//! next step ([`Delay`]). Snapshots are owned values, so a recorded history
//! can be replayed after the run has finished.
//!
//! Element identifiers follow the DOM convention hosts rely on: grid cells are
//! `cell-<row>-<col>`, graph edges are `edge-<a>-<b>` with `a < b`.

use serde::{Deserialize, Serialize};

use crate::data_structures::grid::Cell;

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    // arrays
    Compare,
    Swap,
    Write,
    Sorted,
    Probe,
    Found,
    // grids
    Expand,
    Discover,
    DeadEnd,
    PathMark,
    // graphs
    CandidateEdge,
    TreeEdge,
    // trees
    Insert,
    Rotate,
    Recolor,
    FixedUp,
    Visit,
}

/// Relative weight of a step's pause
///
/// Main actions take the full selected delay. Secondary ones such as
/// neighbor discovery take half of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Beat {
    Full,
    Half,
}

/// Pause the host applies after presenting a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Delay {
    /// Yield for one display frame only
    Frame,
    Fixed { millis: u64 },
}

/// One observable action of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the run, starting at 0
    pub index: usize,
    pub kind: StepKind,
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub delay: Delay,
}

/// Self-contained copy of the structure being animated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Snapshot {
    Array(ArrayView),
    Grid(GridView),
    Graph(GraphView),
    Tree(TreeView),
}

impl Snapshot {
    pub fn as_array(&self) -> Option<&ArrayView> {
        match self {
            Snapshot::Array(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridView> {
        match self {
            Snapshot::Grid(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&GraphView> {
        match self {
            Snapshot::Graph(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeView> {
        match self {
            Snapshot::Tree(view) => Some(view),
            _ => None,
        }
    }
}

/// Bar chart of an array with highlighted positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayView {
    pub values: Vec<i32>,
    /// Indices being compared, swapped or written
    pub focus: Vec<usize>,
    /// Inclusive range still under consideration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<usize>,
}

impl ArrayView {
    pub fn new(values: &[i32], focus: &[usize]) -> Self {
        Self {
            values: values.to_vec(),
            focus: focus.to_vec(),
            window: None,
            pivot: None,
        }
    }

    pub fn with_window(mut self, left: usize, right: usize) -> Self {
        self.window = Some((left, right));
        self
    }

    pub fn with_pivot(mut self, pivot: usize) -> Self {
        self.pivot = Some(pivot);
        self
    }
}

/// Display state of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Open,
    Wall,
    Start,
    End,
    Frontier,
    Visited,
    Path,
    DeadEnd,
}

/// Row-major grid of cell states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<CellState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Cell>,
}

impl GridView {
    pub fn state(&self, cell: Cell) -> Option<CellState> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        self.cells.get(cell.row * self.cols + cell.col).copied()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexView {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub visited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    Idle,
    Candidate,
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    /// DOM-style identifier, `edge-<a>-<b>` with `a < b`
    pub id: String,
    pub from: usize,
    pub to: usize,
    pub weight: u32,
    pub state: EdgeState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub vertices: Vec<VertexView>,
    pub edges: Vec<EdgeView>,
}

impl GraphView {
    pub fn edges_in(&self, state: EdgeState) -> impl Iterator<Item = &EdgeView> {
        self.edges.iter().filter(move |edge| edge.state == state)
    }
}

/// Per-node label drawn under the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Annotation {
    None,
    Height(usize),
    Color(crate::algorithm::tree::Color),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i32>,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub annotation: Annotation,
    pub highlighted: bool,
}

/// Nodes in pre-order, each with its drawing position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeView {
    pub nodes: Vec<NodeView>,
}

impl TreeView {
    pub fn node(&self, value: i32) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.value == value)
    }

    pub fn root(&self) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.parent.is_none())
    }
}

/// Interval-halving tree layout
///
/// The root sits in the middle of the canvas; each child takes the middle of
/// its half of the parent's horizontal interval. Levels are 60 units apart
/// with a 50 unit top margin.
#[derive(Debug, Default)]
pub struct TreeLayout {
    view: TreeView,
}

impl TreeLayout {
    pub const WIDTH: f64 = 600.0;
    pub const LEVEL_HEIGHT: f64 = 60.0;
    pub const TOP_MARGIN: f64 = 50.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds handed to the root
    pub fn root_bounds() -> (f64, f64) {
        (0.0, Self::WIDTH)
    }

    /// Records a node and returns the bounds for its (left, right) children
    pub fn place(
        &mut self,
        value: i32,
        parent: Option<i32>,
        depth: usize,
        bounds: (f64, f64),
        annotation: Annotation,
        highlighted: bool,
    ) -> ((f64, f64), (f64, f64)) {
        let (lo, hi) = bounds;
        let x = (lo + hi) / 2.0;
        self.view.nodes.push(NodeView {
            value,
            parent,
            depth,
            x,
            y: depth as f64 * Self::LEVEL_HEIGHT + Self::TOP_MARGIN,
            annotation,
            highlighted,
        });
        ((lo, x), (x, hi))
    }

    pub fn finish(self) -> TreeView {
        self.view
    }
}
