//! Step sinks: where emitted steps go
//!
//! The core never renders anything. A host supplies a [`StepSink`]; awaiting
//! `accept` is how a host applies backpressure and pacing to the run.

use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use tokio::sync::mpsc;

use crate::algorithm::state::{Delay, Step};
use crate::config::EngineConfig;

/// Receives every step of a run, in order
#[async_trait]
pub trait StepSink: Send {
    async fn accept(&mut self, step: Step);
}

#[async_trait]
impl<S: StepSink + ?Sized> StepSink for Box<S> {
    async fn accept(&mut self, step: Step) {
        (**self).accept(step).await
    }
}

/// Forwards steps to a tokio channel
///
/// A dropped receiver does not stop the run; the sink logs once and discards
/// further steps.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Step>,
    receiver_gone: bool,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Step>) -> Self {
        Self { tx, receiver_gone: false }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Step>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl StepSink for ChannelSink {
    async fn accept(&mut self, step: Step) {
        if self.receiver_gone {
            return;
        }
        if self.tx.send(step).is_err() {
            warn!("Failed to send step: receiver dropped");
            self.receiver_gone = true;
        }
    }
}

/// Applies each step's delay in real time after forwarding it
#[derive(Debug)]
pub struct TimedSink<S> {
    inner: S,
    frame: Duration,
}

impl<S: StepSink> TimedSink<S> {
    pub fn new(inner: S, frame: Duration) -> Self {
        Self { inner, frame }
    }

    pub fn from_config(inner: S, config: &EngineConfig) -> Self {
        Self::new(inner, config.frame_interval())
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn wait_for(&self, delay: Delay) -> Duration {
        match delay {
            Delay::Frame => self.frame,
            Delay::Fixed { millis } => Duration::from_millis(millis),
        }
    }
}

#[async_trait]
impl<S: StepSink> StepSink for TimedSink<S> {
    async fn accept(&mut self, step: Step) {
        let wait = self.wait_for(step.delay);
        self.inner.accept(step).await;
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::{ArrayView, Snapshot, StepKind};
    use crate::execution::history::ExecutionHistory;
    use tokio::time::Instant;

    fn step(index: usize, delay: Delay) -> Step {
        Step {
            index,
            kind: StepKind::Compare,
            snapshot: Snapshot::Array(ArrayView::new(&[1], &[0])),
            note: None,
            delay,
        }
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_in_order() {
        let (mut sink, mut rx) = ChannelSink::channel();
        sink.accept(step(0, Delay::Frame)).await;
        sink.accept(step(1, Delay::Frame)).await;
        assert_eq!(rx.recv().await.unwrap().index, 0);
        assert_eq!(rx.recv().await.unwrap().index, 1);
    }

    #[tokio::test]
    async fn test_channel_sink_survives_dropped_receiver() {
        let (mut sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.accept(step(0, Delay::Frame)).await;
        sink.accept(step(1, Delay::Frame)).await;
        assert!(sink.receiver_gone);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_sink_waits_each_delay() {
        let mut sink = TimedSink::new(ExecutionHistory::new(), Duration::from_millis(16));
        let started = Instant::now();

        sink.accept(step(0, Delay::Fixed { millis: 500 })).await;
        sink.accept(step(1, Delay::Fixed { millis: 250 })).await;
        sink.accept(step(2, Delay::Frame)).await;

        assert!(started.elapsed() >= Duration::from_millis(766));
        assert_eq!(sink.into_inner().step_count(), 3);
    }
}
