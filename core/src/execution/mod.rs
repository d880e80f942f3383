//! Execution layer: contexts, sinks, recorded histories and the run lifecycle

pub mod context;
pub mod engine;
pub mod history;
pub mod sink;

pub use self::context::{CancellationToken, Cancelled, ExecutionContext, Pace};
pub use self::engine::{execute, Engine, RunOutcome, RunReport};
pub use self::history::ExecutionHistory;
pub use self::sink::{ChannelSink, StepSink, TimedSink};
