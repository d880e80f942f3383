use async_trait::async_trait;
use rand::Rng;

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{ArrayView, Beat, Snapshot, StepKind};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmId, Category, Outcome};
use crate::execution::context::{Cancelled, ExecutionContext};

/// Interval halving over an ascending array
#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySearch;

/// `arr[i] = (i + 1) * max_value / size`, ascending
pub fn ascending_values(size: usize, max_value: i64) -> Vec<i32> {
    let size = size.max(1) as i64;
    (0..size)
        .map(|i| ((i + 1) * max_value / size) as i32)
        .collect()
}

/// Searches ascending `values` for `target`
///
/// The window is inclusive and tracked with signed bounds so that an
/// exhausted search reports `right = left - 1`, possibly `-1`.
pub async fn binary_search(
    ctx: &mut ExecutionContext<'_>,
    values: &[i32],
    target: i32,
) -> Result<Outcome, Cancelled> {
    let mut left: isize = 0;
    let mut right: isize = values.len() as isize - 1;

    while left <= right {
        let mid = ((left + right) / 2) as usize;
        let window = ArrayView::new(values, &[mid]).with_window(left as usize, right as usize);
        ctx.narrate(
            StepKind::Probe,
            Snapshot::Array(window),
            Beat::Full,
            format!("checking index {} ({}) for {}", mid, values[mid], target),
        )
        .await?;

        if values[mid] == target {
            let found = ArrayView::new(values, &[mid]);
            ctx.emit(StepKind::Found, Snapshot::Array(found), Beat::Full).await?;
            return Ok(Outcome::Found { index: mid, value: target });
        }
        if values[mid] < target {
            left = mid as isize + 1;
        } else {
            right = mid as isize - 1;
        }
    }

    Ok(Outcome::NotFound { target, left, right })
}

#[async_trait]
impl Algorithm for BinarySearch {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("binarySearch")
    }

    fn name(&self) -> &'static str {
        "Binary Search"
    }

    fn category(&self) -> Category {
        Category::Searching
    }

    fn description(&self) -> &'static str {
        "An efficient algorithm for searching a sorted array by repeatedly dividing the search interval in half."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(log n)", "O(1)", "O(1)", "O(log n)", "O(log n)")
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("arraySize", "Array Size", 5, 50, 20),
            ParameterSpec::number("maxValue", "Max Value", 10, 1000, 100),
            ParameterSpec::speed(),
        ]
    }

    async fn run(
        &self,
        ctx: &mut ExecutionContext<'_>,
        params: &ResolvedParameters,
    ) -> Result<Outcome, Cancelled> {
        ctx.checkpoint()?;
        let values = ascending_values(
            params.count_or("arraySize", 20),
            params.number_or("maxValue", 100),
        );
        let target = values[ctx.rng().gen_range(0..values.len())];
        binary_search(ctx, &values, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::history::ExecutionHistory;
    use crate::test_support::{context, run_recorded};
    use futures::executor::block_on;
    use quickcheck::quickcheck;

    fn search(values: &[i32], target: i32) -> (Outcome, ExecutionHistory) {
        let mut history = ExecutionHistory::new();
        let outcome = {
            let mut ctx = context(&mut history);
            block_on(binary_search(&mut ctx, values, target)).unwrap()
        };
        (outcome, history)
    }

    #[test]
    fn test_generated_array_steps() {
        let values = ascending_values(20, 100);
        assert_eq!(values[0], 5);
        assert_eq!(values[1], 10);
        assert_eq!(values[19], 100);
    }

    #[test]
    fn test_finds_example_value() {
        let values = ascending_values(20, 100);
        let (outcome, history) = search(&values, 10);
        assert_eq!(outcome, Outcome::Found { index: 1, value: 10 });
        assert_eq!(history.kinds().last(), Some(StepKind::Found));
    }

    #[test]
    fn test_absent_value_closes_window() {
        let values = ascending_values(20, 100);
        match search(&values, 12).0 {
            Outcome::NotFound { left, right, .. } => assert!(left > right),
            other => panic!("unexpected outcome {:?}", other),
        }
        match search(&values, 1).0 {
            Outcome::NotFound { left, right, .. } => assert_eq!((left, right), (0, -1)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_probes_narrow_window() {
        let values = ascending_values(8, 80);
        let (_, history) = search(&values, 80);
        let windows: Vec<_> = history
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Probe)
            .filter_map(|s| s.snapshot.as_array().and_then(|a| a.window))
            .collect();
        assert_eq!(windows.first(), Some(&(0, 7)));
        assert!(windows.windows(2).all(|w| w[1].1 - w[1].0 < w[0].1 - w[0].0));
    }

    #[test]
    fn test_run_always_hits() {
        for size in ["5", "17", "50"] {
            let (outcome, _) = run_recorded(&BinarySearch, &[("arraySize", size), ("maxValue", "1000")]);
            assert!(matches!(outcome.unwrap(), Outcome::Found { .. }));
        }
    }

    quickcheck! {
        fn prop_every_element_is_found_at_its_index(size: u8, max: u16) -> bool {
            let size = usize::from(size % 46) + 5;
            let max = i64::from(max % 991) + 10;
            let values = ascending_values(size, max);
            values.iter().all(|&target| match search(&values, target).0 {
                Outcome::Found { index, value } => value == target && values[index] == target,
                _ => false,
            })
        }
    }
}
