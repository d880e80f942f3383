//! Comparison sorts animated step by step
//!
//! Each sort is exposed twice: as a registered [`Algorithm`](crate::Algorithm)
//! that generates its own random array, and as a generic routine over any
//! [`SortItem`] slice so that stability can be observed with tagged values.

mod bubble;
mod merge;
mod quick;
mod selection;

use std::fmt::Debug;

use rand::Rng;

use crate::algorithm::parameters::{ParameterSpec, ResolvedParameters};
use crate::algorithm::state::{ArrayView, Beat, Snapshot, StepKind};
use crate::execution::context::{Cancelled, ExecutionContext};

pub use self::bubble::{bubble_sort, BubbleSort};
pub use self::merge::{merge_sort, MergeSort};
pub use self::quick::{quick_sort, QuickSort};
pub use self::selection::{selection_sort, SelectionSort};

/// Exclusive upper bound of generated values
pub const VALUE_RANGE: i32 = 100;

/// Element a sort can order; only the key takes part in comparisons
pub trait SortItem: Clone + Debug + Send + Sync + 'static {
    fn key(&self) -> i32;
}

impl SortItem for i32 {
    fn key(&self) -> i32 {
        *self
    }
}

pub(crate) fn keys<T: SortItem>(values: &[T]) -> Vec<i32> {
    values.iter().map(SortItem::key).collect()
}

pub(crate) fn view<T: SortItem>(values: &[T], focus: &[usize]) -> Snapshot {
    Snapshot::Array(ArrayView::new(&keys(values), focus))
}

pub(crate) fn sorting_parameters() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::number("arraySize", "Array Size", 5, 50, 20),
        ParameterSpec::speed(),
    ]
}

/// `arraySize` values drawn uniformly from `[0, 100)`
pub(crate) fn random_values(ctx: &mut ExecutionContext<'_>, params: &ResolvedParameters) -> Vec<i32> {
    let size = params.count_or("arraySize", 20);
    (0..size).map(|_| ctx.rng().gen_range(0..VALUE_RANGE)).collect()
}

/// Final all-sorted frame
pub(crate) async fn mark_sorted<T: SortItem>(
    ctx: &mut ExecutionContext<'_>,
    values: &[T],
) -> Result<(), Cancelled> {
    let all: Vec<usize> = (0..values.len()).collect();
    ctx.emit(StepKind::Sorted, view(values, &all), Beat::Full).await
}
