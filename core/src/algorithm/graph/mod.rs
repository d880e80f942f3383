//! Weighted graph algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod mst;

pub use self::mst::{prim, Prim, SpanningTree, UnionFind};
