//! Run lifecycle: at most one active run per engine
//!
//! Starting a run while another is in flight cancels the old one and waits
//! for it to finish before the new one begins, so two runs never drive the
//! same sink concurrently and a stale run can never report after a newer one
//! has started.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::algorithm::parameters::{RawParameters, ResolvedParameters};
use crate::algorithm::registry::Registry;
use crate::algorithm::traits::{Algorithm, AlgorithmError, AlgorithmId, Outcome};
use crate::config::EngineConfig;
use crate::execution::context::{CancellationToken, Cancelled, ExecutionContext};
use crate::execution::sink::StepSink;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(Outcome),
    /// Stopped before completion; the structure was left mid-run
    Cancelled,
}

impl RunOutcome {
    pub fn completed(&self) -> Option<&Outcome> {
        match self {
            RunOutcome::Completed(outcome) => Some(outcome),
            RunOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub algorithm: AlgorithmId,
    pub outcome: RunOutcome,
    /// Steps emitted before the run ended
    pub steps: usize,
}

/// Runs one algorithm to completion or cancellation against `sink`
pub async fn execute(
    algorithm: &dyn Algorithm,
    token: CancellationToken,
    raw: &RawParameters,
    sink: &mut dyn StepSink,
    config: &EngineConfig,
) -> RunReport {
    let params = ResolvedParameters::resolve(&algorithm.parameters(), raw);
    let mut ctx = ExecutionContext::new(token, sink, params.pace(), config.rng());
    info!("Starting {} ({})", algorithm.name(), algorithm.id());

    let outcome = match algorithm.run(&mut ctx, &params).await {
        Ok(outcome) => {
            info!("{} finished after {} steps: {}", algorithm.id(), ctx.steps(), outcome.summary());
            RunOutcome::Completed(outcome)
        }
        Err(Cancelled) => {
            info!("{} cancelled after {} steps", algorithm.id(), ctx.steps());
            RunOutcome::Cancelled
        }
    };

    RunReport {
        algorithm: algorithm.id(),
        outcome,
        steps: ctx.steps(),
    }
}

struct ActiveRun {
    algorithm: AlgorithmId,
    token: CancellationToken,
    handle: JoinHandle<RunReport>,
}

/// Owns the registry and the single active run
pub struct Engine {
    registry: Arc<Registry>,
    config: EngineConfig,
    active: Option<ActiveRun>,
}

impl Engine {
    pub fn new(registry: Arc<Registry>, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            active: None,
        }
    }

    pub fn with_builtins(config: EngineConfig) -> Result<Self, AlgorithmError> {
        Ok(Self::new(Arc::new(Registry::with_builtins()?), config))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id of the run started last, if it has not been collected yet
    pub fn current(&self) -> Option<&AlgorithmId> {
        self.active.as_ref().map(|run| &run.algorithm)
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|run| !run.handle.is_finished())
    }

    /// Starts `id`, superseding any run in flight
    ///
    /// Unknown ids fail before the current run is touched. Returns the report
    /// of the superseded run, if there was one.
    pub async fn start(
        &mut self,
        id: &str,
        raw: RawParameters,
        mut sink: Box<dyn StepSink>,
    ) -> Result<Option<RunReport>, AlgorithmError> {
        let algorithm = self.registry.lookup(id)?;

        let previous = match self.stop().await {
            Ok(report) => report,
            Err(e) => {
                warn!("Previous run ended abnormally: {}", e);
                None
            }
        };

        let token = CancellationToken::new();
        let run_token = token.clone();
        let config = self.config.clone();
        let handle = tokio::spawn(async move {
            execute(algorithm.as_ref(), run_token, &raw, sink.as_mut(), &config).await
        });

        self.active = Some(ActiveRun {
            algorithm: AlgorithmId::new(id),
            token,
            handle,
        });
        Ok(previous)
    }

    /// Cancels the active run and waits until it has released the sink
    pub async fn stop(&mut self) -> Result<Option<RunReport>, AlgorithmError> {
        if let Some(run) = &self.active {
            debug!("Cancelling {}", run.algorithm);
            run.token.cancel();
        }
        self.wait().await
    }

    /// Waits for the active run to end on its own
    pub async fn wait(&mut self) -> Result<Option<RunReport>, AlgorithmError> {
        let Some(run) = self.active.take() else {
            return Ok(None);
        };
        run.handle
            .await
            .map(Some)
            .map_err(|e| AlgorithmError::Execution(format!("{} did not finish: {}", run.algorithm, e)))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(run) = &self.active {
            run.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::StepKind;
    use crate::execution::history::ExecutionHistory;
    use crate::execution::sink::{ChannelSink, TimedSink};
    use std::time::Duration;

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    fn engine() -> Engine {
        Engine::with_builtins(EngineConfig::default().with_seed(3)).unwrap()
    }

    #[tokio::test]
    async fn test_execute_completes_with_history() {
        let registry = Registry::with_builtins().unwrap();
        let algorithm = registry.lookup("bubbleSort").unwrap();
        let mut history = ExecutionHistory::new();

        let report = execute(
            algorithm.as_ref(),
            CancellationToken::new(),
            &raw(&[("arraySize", "8"), ("speed", "0")]),
            &mut history,
            &EngineConfig::default().with_seed(1),
        )
        .await;

        match report.outcome {
            RunOutcome::Completed(Outcome::Sorted { values }) => {
                assert_eq!(values.len(), 8);
                assert!(values.windows(2).all(|w| w[0] <= w[1]));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(report.steps, history.step_count());
        assert_eq!(history.kinds().last(), Some(StepKind::Sorted));
    }

    #[tokio::test]
    async fn test_execute_with_cancelled_token_emits_nothing() {
        let registry = Registry::with_builtins().unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let mut history = ExecutionHistory::new();

        for id in registry.ids() {
            let algorithm = registry.lookup(id.as_str()).unwrap();
            let report = execute(
                algorithm.as_ref(),
                token.clone(),
                &RawParameters::new(),
                &mut history,
                &EngineConfig::default(),
            )
            .await;
            assert!(report.outcome.is_cancelled(), "{} ignored the token", id);
            assert_eq!(report.steps, 0);
        }
        assert_eq!(history.step_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_in_flight_run() {
        let mut engine = engine();
        let (sink, mut rx) = ChannelSink::channel();
        let sink = TimedSink::new(sink, Duration::from_millis(16));

        engine
            .start("mergeSort", raw(&[("speed", "1000")]), Box::new(sink))
            .await
            .unwrap();
        assert!(rx.recv().await.is_some());
        assert!(engine.is_running());

        let report = engine.stop().await.unwrap().unwrap();
        assert!(report.outcome.is_cancelled());
        assert!(!engine.is_running());

        // Nothing arrives once stop has returned
        let delivered = report.steps;
        let mut received = 1;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, delivered);
        assert!(engine.stop().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_supersedes_previous_run() {
        let mut engine = engine();
        let (first, mut first_rx) = ChannelSink::channel();
        engine
            .start("quickSort", RawParameters::new(), Box::new(TimedSink::new(first, Duration::from_millis(16))))
            .await
            .unwrap();
        assert!(first_rx.recv().await.is_some());

        let previous = engine
            .start("binarySearch", raw(&[("speed", "0")]), Box::new(ExecutionHistory::new()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(previous.algorithm.as_str(), "quickSort");
        assert!(previous.outcome.is_cancelled());
        assert_eq!(engine.current().map(AlgorithmId::as_str), Some("binarySearch"));

        let report = engine.wait().await.unwrap().unwrap();
        assert!(matches!(report.outcome.completed(), Some(Outcome::Found { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_leaves_current_run_alone() {
        let mut engine = engine();
        let (sink, _rx) = ChannelSink::channel();
        engine
            .start("astar", raw(&[("speed", "1000")]), Box::new(TimedSink::new(sink, Duration::from_millis(16))))
            .await
            .unwrap();

        let err = engine
            .start("bogoSort", RawParameters::new(), Box::new(ExecutionHistory::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AlgorithmError::UnknownAlgorithm(_)));
        assert_eq!(engine.current().map(AlgorithmId::as_str), Some("astar"));
        engine.stop().await.unwrap();
    }

    #[test]
    fn test_run_outcome_serializes_with_status() {
        let json = serde_json::to_value(RunOutcome::Cancelled).unwrap();
        assert_eq!(json["status"], "cancelled");
    }
}
