//! Grid pathfinding algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>
//!
//! All three searches run on a [`Grid`] with four-way movement and unit step
//! cost. Reaching the end cell yields [`Outcome::PathFound`]; running out of
//! frontier yields [`Outcome::NoPath`], which is an ordinary result.

pub mod astar;
pub mod dfs;
pub mod dijkstra;

pub use self::astar::{astar, AStar};
pub use self::dfs::{depth_first_search, DepthFirstSearch};
pub use self::dijkstra::{dijkstra, Dijkstra};

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Beat, Snapshot, StepKind};
use crate::algorithm::traits::Outcome;
use crate::data_structures::grid::{Cell, Grid};
use crate::execution::context::{Cancelled, ExecutionContext};

pub(crate) fn grid_parameters() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::number("gridSize", "Grid Size", 5, 20, 10),
        ParameterSpec::speed(),
    ]
}

/// Fresh random grid for a run
pub(crate) fn random_grid(ctx: &mut ExecutionContext<'_>, params: &ResolvedParameters) -> Grid {
    let size = params.count_or("gridSize", 10);
    Grid::random(size, ctx.rng())
}

pub(crate) fn frame(grid: &Grid, current: Option<Cell>) -> Snapshot {
    Snapshot::Grid(grid.snapshot(current))
}

/// Marks the route to `end` from its last cell backwards, one step per cell
///
/// Start and end keep their own display state and get no step.
pub(crate) async fn trace_path(
    ctx: &mut ExecutionContext<'_>,
    grid: &mut Grid,
    end: Cell,
) -> Result<Outcome, Cancelled> {
    let path = grid.reconstruct_path(end);
    let start = grid.start();
    for &cell in path.iter().rev() {
        if cell == start || cell == end {
            continue;
        }
        if let Some(state) = grid.get_mut(cell) {
            state.path = true;
        }
        ctx.emit(StepKind::PathMark, frame(grid, Some(cell)), Beat::Half).await?;
    }
    Ok(Outcome::PathFound { path })
}

pub(crate) fn explored(grid: &Grid) -> usize {
    grid.iter_cells()
        .filter(|&cell| grid.get(cell).is_some_and(|c| c.visited))
        .count()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn open_5x5() -> Grid {
        Grid::open(5, 5, Cell::new(0, 0), Cell::new(4, 4))
    }

    /// End cell fenced in by walls on both open sides
    pub fn enclosed_end() -> Grid {
        Grid::with_walls(5, 5, Cell::new(0, 0), Cell::new(4, 4), &[Cell::new(3, 4), Cell::new(4, 3)])
    }

    /// Wall column with a single gap at the bottom
    pub fn corridor() -> Grid {
        let walls: Vec<Cell> = (0..4).map(|row| Cell::new(row, 2)).collect();
        Grid::with_walls(5, 5, Cell::new(0, 0), Cell::new(0, 4), &walls)
    }

    pub fn is_valid_path(grid: &Grid, path: &[Cell]) -> bool {
        path.first() == Some(&grid.start())
            && path.last() == Some(&grid.end())
            && path.iter().all(|&cell| !grid.is_wall(cell))
            && path.windows(2).all(|w| w[0].manhattan(w[1]) == 1)
    }
}
