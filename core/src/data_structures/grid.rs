//! Square-cell grid for path finding
//!
//! Cells carry the per-run search bookkeeping (scores, flags, predecessor).
//! Predecessors are stored as coordinates, never as references, so a grid is
//! a plain owned value with no internal sharing.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::state::{CellState, GridView};

/// Probability that a generated cell is a wall
pub const WALL_PROBABILITY: f64 = 0.2;

/// Orthogonal moves in exploration order: up, right, down, left
pub const MOVES: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Grid coordinate; `row` grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: Cell) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }

    /// Element id used by rendering surfaces
    pub fn element_id(&self) -> String {
        format!("cell-{}-{}", self.row, self.col)
    }

    fn offset(&self, (dr, dc): (isize, isize)) -> Option<Cell> {
        Some(Cell::new(
            self.row.checked_add_signed(dr)?,
            self.col.checked_add_signed(dc)?,
        ))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Search bookkeeping of one cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCell {
    /// Best known cost from the start, `None` while unreached
    pub g: Option<u32>,
    /// Heuristic estimate to the end
    pub h: u32,
    pub wall: bool,
    pub visited: bool,
    pub frontier: bool,
    pub path: bool,
    pub dead_end: bool,
    pub parent: Option<Cell>,
}

impl GridCell {
    pub fn f(&self) -> Option<u32> {
        self.g.map(|g| g + self.h)
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<GridCell>,
    start: Cell,
    end: Cell,
}

impl Grid {
    /// Wall-free `rows × cols` grid
    pub fn open(rows: usize, cols: usize, start: Cell, end: Cell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![GridCell::default(); rows * cols],
            start,
            end,
        }
    }

    /// `size × size` grid from corner to corner with random walls
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let size = size.max(1);
        let end = Cell::new(size - 1, size - 1);
        let mut grid = Self::open(size, size, Cell::new(0, 0), end);
        for cell in grid.cells.iter_mut() {
            cell.wall = rng.gen_bool(WALL_PROBABILITY);
        }
        grid.clear_endpoints();
        grid
    }

    /// Grid with the given walls; walls on start or end are ignored
    pub fn with_walls(rows: usize, cols: usize, start: Cell, end: Cell, walls: &[Cell]) -> Self {
        let mut grid = Self::open(rows, cols, start, end);
        for &wall in walls {
            if let Some(cell) = grid.get_mut(wall) {
                cell.wall = true;
            }
        }
        grid.clear_endpoints();
        grid
    }

    fn clear_endpoints(&mut self) {
        for endpoint in [self.start, self.end] {
            if let Some(cell) = self.get_mut(endpoint) {
                cell.wall = false;
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn get(&self, cell: Cell) -> Option<&GridCell> {
        if self.contains(cell) {
            self.cells.get(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut GridCell> {
        if self.contains(cell) {
            self.cells.get_mut(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.get(cell).map_or(true, |c| c.wall)
    }

    /// Every in-bounds cell in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    /// In-bounds, non-wall neighbours in [`MOVES`] order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        MOVES
            .iter()
            .filter_map(move |&step| cell.offset(step))
            .filter(move |&next| self.contains(next) && !self.is_wall(next))
    }

    /// Walks predecessor links back from `to`; start first
    pub fn reconstruct_path(&self, to: Cell) -> Vec<Cell> {
        let mut path = vec![to];
        let mut current = to;
        while let Some(parent) = self.get(current).and_then(|cell| cell.parent) {
            // a malformed link chain would otherwise loop forever
            if path.len() > self.cells.len() {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.wall).count()
    }

    pub fn snapshot(&self, current: Option<Cell>) -> GridView {
        let cells = self
            .iter_cells()
            .map(|cell| self.display_state(cell))
            .collect();
        GridView {
            rows: self.rows,
            cols: self.cols,
            cells,
            current,
        }
    }

    fn display_state(&self, at: Cell) -> CellState {
        let Some(cell) = self.get(at) else {
            return CellState::Wall;
        };
        if at == self.start {
            CellState::Start
        } else if at == self.end {
            CellState::End
        } else if cell.wall {
            CellState::Wall
        } else if cell.path {
            CellState::Path
        } else if cell.dead_end {
            CellState::DeadEnd
        } else if cell.visited {
            CellState::Visited
        } else if cell.frontier {
            CellState::Frontier
        } else {
            CellState::Open
        }
    }
}
