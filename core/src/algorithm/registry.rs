//! Algorithm registry and descriptor metadata
//!
//! The registry is populated once at startup and is read-only afterwards.
//! Registering the same id twice is a startup error, never a per-run one.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::parameters::{ParameterKind, ParameterSpec};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmId, Category};
use crate::algorithm::builtin_algorithms;

/// Source of translated display text
pub trait TextCatalog {
    fn text(&self, key: &str) -> Option<String>;
}

impl TextCatalog for HashMap<String, String> {
    fn text(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Serializable metadata of a registered algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    pub id: AlgorithmId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub complexity: AlgorithmComplexity,
    pub parameters: Vec<ParameterSpec>,
}

impl AlgorithmDescriptor {
    /// Name and description from `catalog`, built-in text where it has none
    pub fn localized(&self, catalog: &dyn TextCatalog) -> Self {
        let lookup = |suffix: &str, fallback: &str| {
            catalog
                .text(&format!("{}_{}", self.id, suffix))
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| fallback.to_owned())
        };
        Self {
            name: lookup("name", &self.name),
            description: lookup("description", &self.description),
            ..self.clone()
        }
    }
}

/// Ordered collection of algorithms keyed by id
#[derive(Debug, Default)]
pub struct Registry {
    algorithms: Vec<Arc<dyn Algorithm>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in algorithm
    pub fn with_builtins() -> Result<Self, AlgorithmError> {
        let mut registry = Self::new();
        for algorithm in builtin_algorithms() {
            registry.register(algorithm)?;
        }
        debug!("Registry populated with {} algorithms", registry.len());
        Ok(registry)
    }

    pub fn register(&mut self, algorithm: Arc<dyn Algorithm>) -> Result<(), AlgorithmError> {
        let id = algorithm.id();
        if self.contains(id.as_str()) {
            return Err(AlgorithmError::DuplicateAlgorithm(id));
        }
        for spec in algorithm.parameters() {
            check_parameter(&spec)?;
        }
        debug!("Registered algorithm {}", id);
        self.algorithms.push(algorithm);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Result<Arc<dyn Algorithm>, AlgorithmError> {
        self.algorithms
            .iter()
            .find(|algorithm| algorithm.id().as_str() == id)
            .cloned()
            .ok_or_else(|| AlgorithmError::UnknownAlgorithm(id.to_owned()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.algorithms.iter().any(|algorithm| algorithm.id().as_str() == id)
    }

    pub fn ids(&self) -> Vec<AlgorithmId> {
        self.algorithms.iter().map(|algorithm| algorithm.id()).collect()
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> Vec<AlgorithmDescriptor> {
        self.algorithms.iter().map(|algorithm| algorithm.descriptor()).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<AlgorithmDescriptor> {
        self.algorithms
            .iter()
            .filter(|algorithm| algorithm.category() == category)
            .map(|algorithm| algorithm.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

fn check_parameter(spec: &ParameterSpec) -> Result<(), AlgorithmError> {
    let invalid = |reason: String| AlgorithmError::InvalidParameter {
        name: spec.id.clone(),
        reason,
    };
    match &spec.kind {
        ParameterKind::Number { min, max, default } => {
            if min > max || default < min || default > max {
                return Err(invalid(format!("default {} outside {}..={}", default, min, max)));
            }
        }
        ParameterKind::Choice { options, default } => {
            if !options.iter().any(|option| &option.value == default) {
                return Err(invalid(format!("default {:?} is not an option", default)));
            }
        }
    }
    Ok(())
}
