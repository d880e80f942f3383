use async_trait::async_trait;
use futures::future::BoxFuture;

use super::{keys, mark_sorted, random_values, sorting_parameters, SortItem};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{ArrayView, Beat, Snapshot, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Top-down merge sort with temporary halves
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeSort;

pub async fn merge_sort<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &mut [T],
) -> Result<(), Cancelled> {
    if let Some(end) = values.len().checked_sub(1) {
        sort_range(ctx, values, 0, end).await?;
    }
    mark_sorted(ctx, values).await
}

fn sort_range<'a, 's, T: SortItem>(
    ctx: &'a mut ExecutionContext<'s>,
    values: &'a mut [T],
    start: usize,
    end: usize,
) -> BoxFuture<'a, Result<(), Cancelled>> {
    Box::pin(async move {
        if start >= end {
            return Ok(());
        }
        let mid = (start + end) / 2;
        sort_range(ctx, values, start, mid).await?;
        sort_range(ctx, values, mid + 1, end).await?;
        merge(ctx, values, start, mid, end).await
    })
}

fn frame<T: SortItem>(values: &[T], focus: &[usize], start: usize, end: usize) -> Snapshot {
    Snapshot::Array(ArrayView::new(&keys(values), focus).with_window(start, end))
}

/// Merges `start..=mid` with `mid+1..=end`; ties take the left element
async fn merge<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &mut [T],
    start: usize,
    mid: usize,
    end: usize,
) -> Result<(), Cancelled> {
    let left = values[start..=mid].to_vec();
    let right = values[mid + 1..=end].to_vec();
    let (mut i, mut j, mut k) = (0, 0, start);

    while i < left.len() && j < right.len() {
        ctx.emit(
            StepKind::Compare,
            frame(values, &[start + i, mid + 1 + j], start, end),
            Beat::Half,
        )
        .await?;
        if left[i].key() <= right[j].key() {
            values[k] = left[i].clone();
            i += 1;
        } else {
            values[k] = right[j].clone();
            j += 1;
        }
        ctx.emit(StepKind::Write, frame(values, &[k], start, end), Beat::Half).await?;
        k += 1;
    }

    for item in left[i..].iter().chain(&right[j..]) {
        values[k] = item.clone();
        ctx.emit(StepKind::Write, frame(values, &[k], start, end), Beat::Half).await?;
        k += 1;
    }
    Ok(())
}

#[async_trait]
impl Algorithm for MergeSort {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("mergeSort")
    }

    fn name(&self) -> &'static str {
        "Merge Sort"
    }

    fn category(&self) -> Category {
        Category::Sorting
    }

    fn description(&self) -> &'static str {
        "A divide and conquer algorithm that divides an array, sorts subarrays, and merges them back together."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(n log n)", "O(n)", "O(n log n)", "O(n log n)", "O(n log n)")
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
        merge_sort(ctx, &mut values).await?;
        Ok(Outcome::Sorted { values })
    }
}
