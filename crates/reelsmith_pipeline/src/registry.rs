//! Ordered step registry.

use crate::Step;
use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithResult};
use std::collections::HashSet;
use std::sync::Arc;

/// The fixed, ordered list of steps a job runs through.
#[derive(Default)]
pub struct StepRegistry {
    steps: Vec<Arc<dyn Step>>,
}

impl StepRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn register(&mut self, step: impl Step + 'static) {
        self.register_shared(Arc::new(step));
    }

    /// Append a step already registered elsewhere.
    pub fn register_shared(&mut self, step: Arc<dyn Step>) {
        tracing::debug!(step = step.name(), position = self.steps.len(), "Registered step");
        self.steps.push(step);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, step: impl Step + 'static) -> Self {
        self.register(step);
        self
    }

    /// Builder-style [`register_shared`](Self::register_shared).
    pub fn with_shared(mut self, step: Arc<dyn Step>) -> Self {
        self.register_shared(step);
        self
    }

    /// Look up a step by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Step>> {
        self.steps.iter().find(|s| s.name() == name)
    }

    /// Position of a step in execution order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.name() == name)
    }

    /// Steps in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Step>> {
        self.steps.iter()
    }

    /// Step names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// The step that produces `field`, if any.
    pub fn producer_of(&self, field: &str) -> Option<&Arc<dyn Step>> {
        self.steps
            .iter()
            .find(|s| s.produces().iter().any(|p| *p == field))
    }

    /// Number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check the ordering rules.
    ///
    /// Step names are unique, no field is produced by two steps, and every
    /// required field is a seed or the output of a strictly earlier step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegistry` describing the first violation.
    pub fn validate(&self, seeds: &[&str]) -> ReelsmithResult<()> {
        let mut names = HashSet::new();
        let mut available: HashSet<&str> = seeds.iter().copied().collect();
        let mut produced = HashSet::new();

        for step in &self.steps {
            if !names.insert(step.name()) {
                return Err(invalid(format!("duplicate step '{}'", step.name())));
            }
            for field in step.requires() {
                if !available.contains(*field) {
                    return Err(invalid(format!(
                        "step '{}' requires '{}' which no earlier step produces",
                        step.name(),
                        field
                    )));
                }
            }
            for field in step.produces() {
                if !produced.insert(*field) {
                    return Err(invalid(format!(
                        "field '{}' is produced by more than one step",
                        field
                    )));
                }
                available.insert(*field);
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> reelsmith_error::ReelsmithError {
    PipelineError::new(PipelineErrorKind::InvalidRegistry(message)).into()
}
