use async_trait::async_trait;
use futures::future::BoxFuture;

use super::{keys, mark_sorted, random_values, sorting_parameters, SortItem};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{ArrayView, Beat, Snapshot, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Lomuto partitioning around the last element
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickSort;

pub async fn quick_sort<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &mut [T],
) -> Result<(), Cancelled> {
    if let Some(high) = values.len().checked_sub(1) {
        sort_range(ctx, values, 0, high).await?;
    }
    mark_sorted(ctx, values).await
}

fn sort_range<'a, 's, T: SortItem>(
    ctx: &'a mut ExecutionContext<'s>,
    values: &'a mut [T],
    low: usize,
    high: usize,
) -> BoxFuture<'a, Result<(), Cancelled>> {
    Box::pin(async move {
        if low >= high {
            return Ok(());
        }
        let pivot = partition(ctx, values, low, high).await?;
        if pivot > low {
            sort_range(ctx, values, low, pivot - 1).await?;
        }
        sort_range(ctx, values, pivot + 1, high).await
    })
}

fn frame<T: SortItem>(values: &[T], focus: &[usize], low: usize, high: usize) -> Snapshot {
    Snapshot::Array(
        ArrayView::new(&keys(values), focus)
            .with_window(low, high)
            .with_pivot(high),
    )
}

/// Returns the pivot's final position
async fn partition<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &mut [T],
    low: usize,
    high: usize,
) -> Result<usize, Cancelled> {
    let pivot = values[high].key();
    // next slot for an element smaller than the pivot
    let mut store = low;
    for j in low..high {
        ctx.emit(StepKind::Compare, frame(values, &[j, high], low, high), Beat::Half).await?;
        if values[j].key() < pivot {
            if store != j {
                values.swap(store, j);
                ctx.emit(StepKind::Swap, frame(values, &[store, j], low, high), Beat::Half).await?;
            }
            store += 1;
        }
    }
    values.swap(store, high);
    let placed = ArrayView::new(&keys(values), &[store, high])
        .with_window(low, high)
        .with_pivot(store);
    let note = format!("pivot {} placed at {}", pivot, store);
    ctx.narrate(StepKind::Swap, Snapshot::Array(placed), Beat::Full, note).await?;
    Ok(store)
}

#[async_trait]
impl Algorithm for QuickSort {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("quickSort")
    }

    fn name(&self) -> &'static str {
        "Quick Sort"
    }

    fn category(&self) -> Category {
        Category::Sorting
    }

    fn description(&self) -> &'static str {
        "An efficient, in-place sorting algorithm that uses divide and conquer strategy."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(n log n)", "O(log n)", "O(n log n)", "O(n log n)", "O(n²)")
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
        quick_sort(ctx, &mut values).await?;
        Ok(Outcome::Sorted { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::history::ExecutionHistory;
    use crate::test_support::context;
    use futures::executor::block_on;

    #[test]
    fn test_partition_places_pivot() {
        let mut history = ExecutionHistory::new();
        let mut values = vec![7, 2, 9, 1, 5];
        let pivot = {
            let mut ctx = context(&mut history);
            block_on(partition(&mut ctx, &mut values, 0, 4)).unwrap()
        };
        assert_eq!(pivot, 2);
        assert_eq!(values[pivot], 5);
        assert!(values[..pivot].iter().all(|&v| v < 5));
        assert!(values[pivot + 1..].iter().all(|&v| v >= 5));
        assert_eq!(history.count_kind(StepKind::Compare), 4);
    }

    #[test]
    fn test_pivot_is_last_element_of_window() {
        let mut history = ExecutionHistory::new();
        let mut values = vec![3, 1, 2];
        {
            let mut ctx = context(&mut history);
            block_on(quick_sort(&mut ctx, &mut values)).unwrap();
        }
        let first = history.steps()[0].snapshot.as_array().unwrap();
        assert_eq!(first.pivot, Some(2));
        assert_eq!(first.window, Some((0, 2)));
        assert_eq!(values, vec![1, 2, 3]);
    }
}
