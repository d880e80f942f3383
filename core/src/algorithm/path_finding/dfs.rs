use async_trait::async_trait;
use futures::future::BoxFuture;

use super::{explored, frame, grid_parameters, random_grid};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Beat, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::data_structures::grid::{Cell, Grid};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Recursive depth-first exploration
///
/// Finds *a* path, not necessarily a shortest one. Every cell the search
/// backs out of is marked as a dead end and stays marked.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthFirstSearch;

fn explore<'a, 's>(
    ctx: &'a mut ExecutionContext<'s>,
    grid: &'a mut Grid,
    at: Cell,
    path: &'a mut Vec<Cell>,
) -> BoxFuture<'a, Result<bool, Cancelled>>
where
    's: 'a,
{
    Box::pin(async move {
        ctx.checkpoint()?;
        match grid.get_mut(at) {
            Some(cell) if !cell.wall && !cell.visited => cell.visited = true,
            _ => return Ok(false),
        }
        path.push(at);
        ctx.emit(StepKind::Expand, frame(grid, Some(at)), Beat::Full).await?;

        if at == grid.end() {
            for &cell in path.iter() {
                if let Some(state) = grid.get_mut(cell) {
                    state.path = true;
                }
            }
            ctx.emit(StepKind::PathMark, frame(grid, Some(at)), Beat::Full).await?;
            return Ok(true);
        }

        let neighbors: Vec<Cell> = grid.neighbors(at).collect();
        for next in neighbors {
            if explore(&mut *ctx, &mut *grid, next, &mut *path).await? {
                return Ok(true);
            }
        }

        path.pop();
        if let Some(cell) = grid.get_mut(at) {
            cell.dead_end = true;
        }
        ctx.narrate(
            StepKind::DeadEnd,
            frame(grid, Some(at)),
            Beat::Half,
            format!("backtracking from {}", at),
        )
        .await?;
        Ok(false)
    })
}

pub async fn depth_first_search(
    ctx: &mut ExecutionContext<'_>,
    grid: &mut Grid,
) -> Result<Outcome, Cancelled> {
    let mut path = Vec::new();
    let start = grid.start();
    if explore(ctx, grid, start, &mut path).await? {
        Ok(Outcome::PathFound { path })
    } else {
        Ok(Outcome::NoPath { explored: explored(grid) })
    }
}

#[async_trait]
impl Algorithm for DepthFirstSearch {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("depthFirstSearch")
    }

    fn name(&self) -> &'static str {
        "Depth First Search"
    }

    fn category(&self) -> Category {
        Category::PathFinding
    }

    fn description(&self) -> &'static str {
        "A graph traversal algorithm that explores as far as possible along each branch before backtracking."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V + E)", "O(V)", "O(1)", "O(V + E)", "O(V + E)")
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
        depth_first_search(ctx, &mut grid).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::algorithm::state::CellState;
    use crate::execution::history::ExecutionHistory;
    use crate::test_support::{context, run_recorded};
    use futures::executor::block_on;

    fn run(grid: &mut Grid) -> (Outcome, ExecutionHistory) {
        let mut history = ExecutionHistory::new();
        let outcome = {
            let mut ctx = context(&mut history);
            block_on(depth_first_search(&mut ctx, grid)).unwrap()
        };
        (outcome, history)
    }

    #[test]
    fn test_follows_move_order_on_open_grid() {
        let mut grid = open_5x5();
        let (outcome, history) = run(&mut grid);
        let Outcome::PathFound { path } = outcome else {
            panic!("expected a path");
        };
        // right along the top row first, then down the last column
        let expected: Vec<Cell> = (0..5)
            .map(|col| Cell::new(0, col))
            .chain((1..5).map(|row| Cell::new(row, 4)))
            .collect();
        assert_eq!(path, expected);
        assert_eq!(history.count_kind(StepKind::DeadEnd), 0);
        assert_eq!(history.count_kind(StepKind::PathMark), 1);
    }

    #[test]
    fn test_backtracking_marks_dead_end() {
        let mut grid = Grid::with_walls(
            3,
            3,
            Cell::new(0, 0),
            Cell::new(2, 2),
            &[Cell::new(1, 1), Cell::new(0, 2)],
        );
        let (outcome, history) = run(&mut grid);
        let Outcome::PathFound { path } = outcome else {
            panic!("expected a path");
        };
        assert_eq!(
            path,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)]
        );
        assert!(is_valid_path(&grid, &path));

        let dead_end = history.last_of_kind(StepKind::DeadEnd).unwrap();
        assert_eq!(dead_end.note.as_deref(), Some("backtracking from (0, 1)"));
        let last = history.last_snapshot().and_then(|s| s.as_grid()).unwrap();
        assert_eq!(last.state(Cell::new(0, 1)), Some(CellState::DeadEnd));
        assert_eq!(last.state(Cell::new(1, 0)), Some(CellState::Path));
    }

    #[test]
    fn test_exhausted_search_marks_every_cell_dead() {
        let mut grid = enclosed_end();
        let (outcome, history) = run(&mut grid);
        assert_eq!(outcome, Outcome::NoPath { explored: 22 });
        assert_eq!(history.count_kind(StepKind::DeadEnd), 22);
        assert_eq!(history.count_kind(StepKind::Expand), 22);
    }

    #[test]
    fn test_random_run_never_revisits() {
        let (outcome, history) = run_recorded(&DepthFirstSearch, &[("gridSize", "15")]);
        outcome.unwrap();
        let mut expanded: Vec<Cell> = history
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Expand)
            .filter_map(|s| s.snapshot.as_grid().and_then(|g| g.current))
            .collect();
        let total = expanded.len();
        expanded.sort();
        expanded.dedup();
        assert_eq!(expanded.len(), total);
    }
}
