//! Step trait and step output.

use crate::{JobState, StepContext};
use async_trait::async_trait;
use reelsmith_checkpoint::FieldMap;
use reelsmith_error::{PersistenceError, PersistenceErrorKind, ReelsmithResult};
use serde::Serialize;
use serde_json::Value;

/// Fields written by one step execution.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::StepOutput;
///
/// let output = StepOutput::new()
///     .with("voiceover_duration", 27.5)
///     .unwrap()
///     .with("main_topic", Option::<String>::None)
///     .unwrap();
/// assert_eq!(output.len(), 2);
/// assert!(output.contains("main_topic"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    fields: FieldMap,
}

impl StepOutput {
    /// An empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` cannot be encoded as JSON.
    pub fn with(mut self, field: &str, value: impl Serialize) -> ReelsmithResult<Self> {
        let value = serde_json::to_value(value).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Serialization {
                field: field.to_string(),
                message: e.to_string(),
            })
        })?;
        self.fields.insert(field.to_string(), value);
        Ok(self)
    }

    /// True when the output carries `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field was written.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Consume into `(field, value)` pairs.
    pub fn into_fields(self) -> impl Iterator<Item = (String, Value)> {
        self.fields.into_iter()
    }
}

/// A named unit of pipeline work with declared inputs and outputs.
///
/// A step is skipped when every field it produces is populated, so a body
/// must produce all declared fields (and nothing else) or the executor
/// rejects the result.
#[async_trait]
pub trait Step: Send + Sync {
    /// Unique step name.
    fn name(&self) -> &'static str;

    /// Fields that must be populated before the body runs.
    fn requires(&self) -> &'static [&'static str];

    /// Fields the body writes.
    fn produces(&self) -> &'static [&'static str];

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Any error aborts the run; the executor annotates it with the job id
    /// and step name.
    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput>;
}
