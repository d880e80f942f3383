//! A* search on a uniform-cost grid
//!
//! The open set is a plain vector scanned for its minimum, which is cheap at
//! the grid sizes animated here (at most 400 cells) and makes tie-breaking
//! explicit: among equal `f` scores the entry that joined the open set first
//! is expanded first. A score improvement updates `f` in place and keeps the
//! entry's original position in that order.

use async_trait::async_trait;

use super::{explored, frame, grid_parameters, random_grid, trace_path};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Beat, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::data_structures::grid::{Cell, Grid};
use crate::execution::context::{Cancelled, ExecutionContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct AStar;

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    cell: Cell,
    f: u32,
    /// Insertion sequence number
    seq: usize,
}

#[derive(Debug, Default)]
struct OpenSet {
    entries: Vec<OpenEntry>,
    next_seq: usize,
}

impl OpenSet {
    /// Returns false if `cell` was already present (its score is updated)
    fn push_or_update(&mut self, cell: Cell, f: u32) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.cell == cell) {
            entry.f = f;
            return false;
        }
        self.entries.push(OpenEntry { cell, f, seq: self.next_seq });
        self.next_seq += 1;
        true
    }

    fn pop_min(&mut self) -> Option<Cell> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| (e.f, e.seq))?;
        Some(self.entries.swap_remove(index).cell)
    }
}

pub async fn astar(ctx: &mut ExecutionContext<'_>, grid: &mut Grid) -> Result<Outcome, Cancelled> {
    let (start, end) = (grid.start(), grid.end());
    let mut open = OpenSet::default();

    if let Some(cell) = grid.get_mut(start) {
        cell.g = Some(0);
        cell.h = start.manhattan(end);
        cell.frontier = true;
        open.push_or_update(start, cell.h);
    }

    while let Some(current) = open.pop_min() {
        ctx.checkpoint()?;
        let g = match grid.get_mut(current) {
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
            let tentative = g + 1;
            let discovered = match grid.get_mut(next) {
                Some(cell) if !cell.visited && cell.g.map_or(true, |old| tentative < old) => {
                    cell.g = Some(tentative);
                    cell.h = next.manhattan(end);
                    cell.parent = Some(current);
                    cell.frontier = true;
                    open.push_or_update(next, tentative + cell.h)
                }
                _ => false,
            };
            if discovered {
                ctx.emit(StepKind::Discover, frame(grid, Some(next)), Beat::Half).await?;
            }
        }
    }

    Ok(Outcome::NoPath { explored: explored(grid) })
}

#[async_trait]
impl Algorithm for AStar {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("astar")
    }

    fn name(&self) -> &'static str {
        "A* Search"
    }

    fn category(&self) -> Category {
        Category::PathFinding
    }

    fn description(&self) -> &'static str {
        "An informed search algorithm that finds the shortest path between nodes using heuristics."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(b^d)", "O(b^d)", "O(d)", "O(b^d)", "O(b^d)")
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
        astar(ctx, &mut grid).await
    }
}
