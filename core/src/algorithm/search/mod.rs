//! Searching over ordered arrays

mod binary;

pub use self::binary::{ascending_values, binary_search, BinarySearch};
