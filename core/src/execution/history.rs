//! Execution history management for algorithm tracing
//!
//! An [`ExecutionHistory`] is the recording sink: it keeps every step of a
//! run without pausing, indexes them by kind, and can be navigated or
//! exported afterwards. Tests drive algorithms against it; hosts use it for
//! replay.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::algorithm::state::{Snapshot, Step, StepKind};
use crate::algorithm::traits::AlgorithmError;
use crate::execution::sink::StepSink;

/// Metadata for execution history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Algorithm identifier, when known
    pub algorithm: Option<String>,

    /// Raw parameters the run was started with
    pub parameters: HashMap<String, String>,

    /// Total number of recorded steps
    pub step_count: usize,
}

/// Serialized form of a history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedHistory {
    pub metadata: ExecutionMetadata,
    pub steps: Vec<Step>,
}

/// Execution history manager for algorithm traces
#[derive(Debug, Default)]
pub struct ExecutionHistory {
    metadata: ExecutionMetadata,

    /// Steps in emission order
    steps: Vec<Step>,

    /// Step positions per kind
    by_kind: HashMap<StepKind, Vec<usize>>,
}

impl ExecutionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History labelled with the run it records
    pub fn for_run(algorithm: &str, parameters: HashMap<String, String>) -> Self {
        Self {
            metadata: ExecutionMetadata {
                algorithm: Some(algorithm.to_owned()),
                parameters,
                step_count: 0,
            },
            ..Self::default()
        }
    }

    pub fn record(&mut self, step: Step) {
        self.by_kind.entry(step.kind).or_default().push(self.steps.len());
        self.steps.push(step);
        self.metadata.step_count = self.steps.len();
    }

    pub fn metadata(&self) -> &ExecutionMetadata {
        &self.metadata
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Positions of every step of `kind`
    pub fn find_kind(&self, kind: StepKind) -> &[usize] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_kind(&self, kind: StepKind) -> usize {
        self.find_kind(kind).len()
    }

    pub fn kinds(&self) -> impl Iterator<Item = StepKind> + '_ {
        self.steps.iter().map(|step| step.kind)
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.steps.last().map(|step| &step.snapshot)
    }

    pub fn last_of_kind(&self, kind: StepKind) -> Option<&Step> {
        self.find_kind(kind).last().and_then(|&i| self.steps.get(i))
    }

    pub fn export(&self) -> SerializedHistory {
        SerializedHistory {
            metadata: self.metadata.clone(),
            steps: self.steps.clone(),
        }
    }

    pub fn import(serialized: SerializedHistory) -> Self {
        let mut history = Self {
            metadata: serialized.metadata,
            ..Self::default()
        };
        for step in serialized.steps {
            history.record(step);
        }
        history
    }

    pub fn to_json(&self) -> Result<String, AlgorithmError> {
        Ok(serde_json::to_string(&self.export())?)
    }

    pub fn from_json(json: &str) -> Result<Self, AlgorithmError> {
        Ok(Self::import(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl StepSink for ExecutionHistory {
    async fn accept(&mut self, step: Step) {
        self.record(step);
    }
}
