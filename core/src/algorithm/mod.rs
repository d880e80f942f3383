//! ALGOSCOPE Algorithm Framework
//! Step-driven classical algorithms behind a single registry
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod parameters;
pub mod state;
pub mod registry;
pub mod sorting;
pub mod search;
pub mod path_finding;
pub mod graph;
pub mod tree;

use std::sync::Arc;

pub use self::traits::*;
pub use self::registry::{AlgorithmDescriptor, Registry, TextCatalog};
pub use self::sorting::{BubbleSort, MergeSort, QuickSort, SelectionSort};
pub use self::search::BinarySearch;
pub use self::path_finding::{AStar, DepthFirstSearch, Dijkstra};
pub use self::graph::Prim;
pub use self::tree::{AvlTreeOperations, BinaryTreeTraversal, RedBlackTreeOperations};

/// Every algorithm shipped with the engine, in menu order.
pub fn builtin_algorithms() -> Vec<Arc<dyn Algorithm>> {
    vec![
        Arc::new(BubbleSort),
        Arc::new(SelectionSort),
        Arc::new(QuickSort),
        Arc::new(MergeSort),
        Arc::new(BinarySearch),
        Arc::new(AStar),
        Arc::new(Dijkstra),
        Arc::new(DepthFirstSearch),
        Arc::new(Prim),
        Arc::new(AvlTreeOperations),
        Arc::new(RedBlackTreeOperations),
        Arc::new(BinaryTreeTraversal),
    ]
}
