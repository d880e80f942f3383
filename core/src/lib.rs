//! ALGOSCOPE core: the algorithm engine
//!
//! A registry of classical algorithms (sorting, searching, grid path finding,
//! minimum spanning trees, balanced trees, traversals), each written as a
//! step-driven routine that reports structured snapshots to a host-supplied
//! sink and polls a cooperative cancellation token at every step.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod execution;

#[cfg(test)]
pub(crate) mod test_support;

pub use algorithm::{
    builtin_algorithms, Algorithm, AlgorithmComplexity, AlgorithmDescriptor, AlgorithmError,
    AlgorithmId, Category, Outcome, Registry,
};
pub use algorithm::parameters::{ParameterKind, ParameterSpec, RawParameters, ResolvedParameters};
pub use algorithm::state::{Delay, Snapshot, Step, StepKind};
pub use config::EngineConfig;
pub use execution::{
    execute, CancellationToken, ChannelSink, Engine, ExecutionContext, ExecutionHistory, RunOutcome,
    RunReport, StepSink, TimedSink,
};
