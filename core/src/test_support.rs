//! Test-only helpers for driving algorithms against a recording sink.

use futures::executor::block_on;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithm::parameters::{RawParameters, ResolvedParameters};
use crate::algorithm::traits::{Algorithm, Outcome};
use crate::execution::context::{CancellationToken, Cancelled, ExecutionContext, Pace};
use crate::execution::history::ExecutionHistory;

/// Seed used by every deterministic test run.
pub const SEED: u64 = 7;

/// Install a test logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Context over `history` with a fixed seed and frame pacing.
pub fn context(history: &mut ExecutionHistory) -> ExecutionContext<'_> {
    init_logging();
    ExecutionContext::new(
        CancellationToken::new(),
        history,
        Pace::from_millis(0),
        StdRng::seed_from_u64(SEED),
    )
}

/// Build a raw parameter map from string pairs.
pub fn raw(pairs: &[(&str, &str)]) -> RawParameters {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

/// Run a registered algorithm to the end and return its outcome and steps.
pub fn run_recorded(
    algorithm: &dyn Algorithm,
    pairs: &[(&str, &str)],
) -> (Result<Outcome, Cancelled>, ExecutionHistory) {
    let params = ResolvedParameters::resolve(&algorithm.parameters(), &raw(pairs));
    let mut history = ExecutionHistory::new();
    let outcome = {
        let mut ctx = context(&mut history);
        block_on(algorithm.run(&mut ctx, &params))
    };
    (outcome, history)
}
