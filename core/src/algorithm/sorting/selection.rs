use async_trait::async_trait;

use super::{mark_sorted, random_values, sorting_parameters, view, SortItem};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{ArrayView, Beat, Snapshot, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Repeated minimum selection with one swap per position
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionSort;

pub async fn selection_sort<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &mut [T],
) -> Result<(), Cancelled> {
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        ctx.checkpoint()?;
        let mut min = i;
        for j in (i + 1)..n {
            let snapshot = ArrayView::new(&super::keys(values), &[j, min]).with_window(i, n - 1);
            ctx.emit(StepKind::Compare, Snapshot::Array(snapshot), Beat::Full).await?;
            if values[j].key() < values[min].key() {
                min = j;
            }
        }
        if min != i {
            values.swap(i, min);
            ctx.emit(StepKind::Swap, view(values, &[i, min]), Beat::Full).await?;
        }
    }
    mark_sorted(ctx, values).await
}

#[async_trait]
impl Algorithm for SelectionSort {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("selectionSort")
    }

    fn name(&self) -> &'static str {
        "Selection Sort"
    }

    fn category(&self) -> Category {
        Category::Sorting
    }

    fn description(&self) -> &'static str {
        "A simple sorting algorithm that repeatedly finds the minimum element from the unsorted portion."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(n²)", "O(1)", "O(n²)", "O(n²)", "O(n²)")
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        sorting_parameters()
    }

    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled> {
        ctx.checkpoint()?;
        let mut values = random_values(ctx, params);
        selection_sort(ctx, &mut values).await?;
        Ok(Outcome::Sorted { values })
    }
}
