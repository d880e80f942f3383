use async_trait::async_trait;

use super::{explored, frame, grid_parameters, random_grid, trace_path};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Beat, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::data_structures::grid::{Cell, Grid};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Uniform-cost search over every open cell
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

/// Index into `unvisited` of the closest reached cell
///
/// Strict comparison keeps the first candidate in row-major order on ties.
fn closest(grid: &Grid, unvisited: &[Cell]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &cell) in unvisited.iter().enumerate() {
        let Some(distance) = grid.get(cell).and_then(|c| c.g) else {
            continue;
        };
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

pub async fn dijkstra(ctx: &mut ExecutionContext<'_>, grid: &mut Grid) -> Result<Outcome, Cancelled> {
    let (start, end) = (grid.start(), grid.end());
    let mut unvisited: Vec<Cell> = grid.iter_cells().filter(|&cell| !grid.is_wall(cell)).collect();
    if let Some(cell) = grid.get_mut(start) {
        cell.g = Some(0);
    }

    while let Some(index) = closest(grid, &unvisited) {
        ctx.checkpoint()?;
        let current = unvisited.remove(index);
        let distance = match grid.get_mut(current) {
            Some(cell) => {
                cell.visited = true;
                cell.frontier = false;
                cell.g.unwrap_or(0)
            }
            None => continue,
        };
        ctx.emit(StepKind::Expand, frame(grid, Some(current)), Beat::Full).await?;

        if current == end {
            return trace_path(ctx, grid, end).await;
        }

        let neighbors: Vec<Cell> = grid.neighbors(current).collect();
        for next in neighbors {
            let relaxed = match grid.get_mut(next) {
                Some(cell) if !cell.visited && cell.g.map_or(true, |old| distance + 1 < old) => {
                    cell.g = Some(distance + 1);
                    cell.parent = Some(current);
                    cell.frontier = true;
                    true
                }
                _ => false,
            };
            if relaxed {
                ctx.emit(StepKind::Discover, frame(grid, Some(next)), Beat::Half).await?;
            }
        }
    }

    Ok(Outcome::NoPath { explored: explored(grid) })
}

#[async_trait]
impl Algorithm for Dijkstra {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("dijkstra")
    }

    fn name(&self) -> &'static str {
        "Dijkstra's Algorithm"
    }

    fn category(&self) -> Category {
        Category::PathFinding
    }

    fn description(&self) -> &'static str {
        "A pathfinding algorithm that finds the shortest path between nodes in a graph."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V²)", "O(V)", "O(V²)", "O(V²)", "O(V²)")
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        grid_parameters()
    }

    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled> {
        ctx.checkpoint()?;
        let mut grid = random_grid(ctx, params);
        dijkstra(ctx, &mut grid).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::execution::history::ExecutionHistory;
    use crate::test_support::{context, run_recorded};
    use futures::executor::block_on;

    fn run(grid: &mut Grid) -> (Outcome, ExecutionHistory) {
        let mut history = ExecutionHistory::new();
        let outcome = {
            let mut ctx = context(&mut history);
            block_on(dijkstra(&mut ctx, grid)).unwrap()
        };
        (outcome, history)
    }

    #[test]
    fn test_ties_resolve_in_row_major_order() {
        let mut grid = open_5x5();
        grid.get_mut(Cell::new(0, 1)).unwrap().g = Some(1);
        grid.get_mut(Cell::new(1, 0)).unwrap().g = Some(1);
        let unvisited = vec![Cell::new(1, 0), Cell::new(0, 1)];
        assert_eq!(closest(&grid, &unvisited), Some(0));
        assert_eq!(closest(&open_5x5(), &[Cell::new(2, 2)]), None);
    }

    #[test]
    fn test_expands_every_closer_cell_first() {
        let mut grid = open_5x5();
        let (outcome, history) = run(&mut grid);
        assert_eq!(outcome.hops(), Some(8));
        // the end is the unique farthest cell
        assert_eq!(history.count_kind(StepKind::Expand), 25);

        let expanded: Vec<Cell> = history
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Expand)
            .filter_map(|s| s.snapshot.as_grid().and_then(|g| g.current))
            .collect();
        assert_eq!(&expanded[..3], &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0)]);
    }

    #[test]
    fn test_enclosed_end_explores_whole_component() {
        let mut grid = enclosed_end();
        let (outcome, history) = run(&mut grid);
        // 25 cells minus two walls and the sealed end
        assert_eq!(outcome, Outcome::NoPath { explored: 22 });
        assert_eq!(history.count_kind(StepKind::PathMark), 0);
    }

    #[test]
    fn test_random_run_paths_are_contiguous() {
        let (outcome, _) = run_recorded(&Dijkstra, &[("gridSize", "12")]);
        if let Outcome::PathFound { path } = outcome.unwrap() {
            assert_eq!(path.last(), Some(&Cell::new(11, 11)));
            assert!(path.windows(2).all(|w| w[0].manhattan(w[1]) == 1));
        }
    }
}
