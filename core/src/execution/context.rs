//! Per-run execution context: cancellation, pacing and step emission
//!
//! An [`ExecutionContext`] is created for exactly one run and dropped when it
//! ends. Algorithms never talk to a sink directly; they call
//! [`ExecutionContext::emit`], which checks the run's token before and after
//! handing the step over, so a stop request is observed at the very next
//! step boundary even while the host is pausing.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::trace;
use rand::rngs::StdRng;

use crate::algorithm::state::{Beat, Delay, Snapshot, Step, StepKind};
use crate::execution::sink::StepSink;

/// Shared stop flag for a single run
///
/// Cloning yields a handle to the same flag. A token is never reset; a new
/// run always gets a new token.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Marker returned through `?` once the token has been signalled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("run cancelled")
    }
}

/// Delay selection for a run, derived from the speed parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    millis: u64,
}

impl Pace {
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn millis(&self) -> u64 {
        self.millis
    }

    /// `0` always means one display frame, whatever the beat
    pub fn delay(&self, beat: Beat) -> Delay {
        match (self.millis, beat) {
            (0, _) => Delay::Frame,
            (millis, Beat::Full) => Delay::Fixed { millis },
            (millis, Beat::Half) => Delay::Fixed { millis: millis / 2 },
        }
    }
}

/// Everything a running algorithm may touch besides its own state
pub struct ExecutionContext<'s> {
    token: CancellationToken,
    sink: &'s mut dyn StepSink,
    pace: Pace,
    rng: StdRng,
    steps: usize,
}

impl<'s> ExecutionContext<'s> {
    pub fn new(token: CancellationToken, sink: &'s mut dyn StepSink, pace: Pace, rng: StdRng) -> Self {
        Self {
            token,
            sink,
            pace,
            rng,
            steps: 0,
        }
    }

    /// Fails once the run has been asked to stop
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    pub async fn emit(&mut self, kind: StepKind, snapshot: Snapshot, beat: Beat) -> Result<(), Cancelled> {
        self.dispatch(kind, snapshot, beat, None).await
    }

    /// Like [`emit`](Self::emit) with a human-readable note attached
    pub async fn narrate(
        &mut self,
        kind: StepKind,
        snapshot: Snapshot,
        beat: Beat,
        note: impl Into<String>,
    ) -> Result<(), Cancelled> {
        let note = note.into();
        self.dispatch(kind, snapshot, beat, Some(note)).await
    }

    async fn dispatch(
        &mut self,
        kind: StepKind,
        snapshot: Snapshot,
        beat: Beat,
        note: Option<String>,
    ) -> Result<(), Cancelled> {
        self.checkpoint()?;
        let step = Step {
            index: self.steps,
            kind,
            snapshot,
            note,
            delay: self.pace.delay(beat),
        };
        self.steps += 1;
        trace!("step {} {:?} ({:?})", step.index, step.kind, step.delay);
        self.sink.accept(step).await;
        self.checkpoint()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    /// Steps emitted so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::ArrayView;
    use crate::execution::history::ExecutionHistory;
    use futures::executor::block_on;
    use rand::SeedableRng;

    fn snapshot() -> Snapshot {
        Snapshot::Array(ArrayView::new(&[1, 2], &[]))
    }

    #[test]
    fn test_pace_halves_secondary_beats() {
        let pace = Pace::from_millis(1000);
        assert_eq!(pace.delay(Beat::Full), Delay::Fixed { millis: 1000 });
        assert_eq!(pace.delay(Beat::Half), Delay::Fixed { millis: 500 });
        assert_eq!(Pace::from_millis(0).delay(Beat::Full), Delay::Frame);
    }

    #[test]
    fn test_steps_are_indexed_in_order() {
        let mut history = ExecutionHistory::new();
        let mut ctx = ExecutionContext::new(
            CancellationToken::new(),
            &mut history,
            Pace::from_millis(100),
            StdRng::seed_from_u64(1),
        );
        block_on(async {
            ctx.emit(StepKind::Compare, snapshot(), Beat::Half).await.unwrap();
            ctx.narrate(StepKind::Swap, snapshot(), Beat::Full, "swap 0 and 1").await.unwrap();
        });
        assert_eq!(ctx.steps(), 2);

        let steps = history.steps();
        assert_eq!(steps[0].index, 0);
        assert_eq!(steps[1].index, 1);
        assert_eq!(steps[1].note.as_deref(), Some("swap 0 and 1"));
        assert_eq!(steps[0].delay, Delay::Fixed { millis: 50 });
    }

    #[test]
    fn test_cancelled_token_suppresses_emission() {
        let token = CancellationToken::new();
        let mut history = ExecutionHistory::new();
        let mut ctx = ExecutionContext::new(
            token.clone(),
            &mut history,
            Pace::from_millis(0),
            StdRng::seed_from_u64(1),
        );
        token.cancel();
        assert_eq!(ctx.checkpoint(), Err(Cancelled));
        assert_eq!(block_on(ctx.emit(StepKind::Compare, snapshot(), Beat::Full)), Err(Cancelled));
        assert_eq!(ctx.steps(), 0);
        assert_eq!(history.step_count(), 0);
    }

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
