use async_trait::async_trait;

use super::{mark_sorted, random_values, sorting_parameters, view, SortItem};
use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{Beat, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Adjacent compare-and-swap passes
#[derive(Debug, Default, Clone, Copy)]
pub struct BubbleSort;

/// Sorts `values` in place; equal keys never swap, so the sort is stable
pub async fn bubble_sort<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &mut [T],
) -> Result<(), Cancelled> {
    let n = values.len();
    for pass in 0..n {
        ctx.checkpoint()?;
        for j in 0..n - pass - 1 {
            ctx.emit(StepKind::Compare, view(values, &[j, j + 1]), Beat::Half).await?;
            if values[j].key() > values[j + 1].key() {
                values.swap(j, j + 1);
                ctx.emit(StepKind::Swap, view(values, &[j, j + 1]), Beat::Full).await?;
            }
        }
    }
    mark_sorted(ctx, values).await
}

#[async_trait]
impl Algorithm for BubbleSort {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("bubbleSort")
    }

    fn name(&self) -> &'static str {
        "Bubble Sort"
    }

    fn category(&self) -> Category {
        Category::Sorting
    }

    fn description(&self) -> &'static str {
        "A simple sorting algorithm that repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order."
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
        bubble_sort(ctx, &mut values).await?;
        Ok(Outcome::Sorted { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, run_recorded};
    use crate::execution::history::ExecutionHistory;
    use futures::executor::block_on;

    #[test]
    fn test_compares_precede_swaps() {
        let mut history = ExecutionHistory::new();
        let mut values = vec![2, 1];
        {
            let mut ctx = context(&mut history);
            block_on(bubble_sort(&mut ctx, &mut values)).unwrap();
        }
        let kinds: Vec<StepKind> = history.kinds().collect();
        assert_eq!(kinds, vec![StepKind::Compare, StepKind::Swap, StepKind::Sorted]);
        assert_eq!(history.steps()[1].snapshot.as_array().unwrap().values, vec![1, 2]);
    }

    #[test]
    fn test_sorted_input_never_swaps() {
        let mut history = ExecutionHistory::new();
        let mut values = vec![1, 2, 3, 4];
        {
            let mut ctx = context(&mut history);
            block_on(bubble_sort(&mut ctx, &mut values)).unwrap();
        }
        assert_eq!(history.count_kind(StepKind::Swap), 0);
        assert_eq!(history.count_kind(StepKind::Compare), 6);
    }

    #[test]
    fn test_run_uses_array_size() {
        let (outcome, _) = run_recorded(&BubbleSort, &[("arraySize", "12")]);
        match outcome.unwrap() {
            Outcome::Sorted { values } => {
                assert_eq!(values.len(), 12);
                assert!(values.iter().all(|v| (0..100).contains(v)));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
