//! Job state.

use crate::StepRegistry;
use reelsmith_checkpoint::FieldMap;
use reelsmith_core::{JobId, fields};
use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

/// The fields of one job as seen by the steps.
///
/// Reads go to this in-memory copy; writes go through the checkpoint store
/// first and are mirrored here by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct JobState {
    job_id: JobId,
    fields: FieldMap,
}

impl JobState {
    /// Wrap loaded fields.
    pub fn new(job_id: JobId, fields: FieldMap) -> Self {
        Self { job_id, fields }
    }

    /// Identity of the job.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// All populated fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// True when the field is present, even if its value is null.
    pub fn is_populated(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Raw value of a field.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Decode a populated field.
    ///
    /// # Errors
    ///
    /// Returns `FieldType` if the field is absent or has another shape.
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> ReelsmithResult<T> {
        let value = self.fields.get(field).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::FieldType {
                field: field.to_string(),
                message: "field is not populated".to_string(),
            })
        })?;
        decode(field, value)
    }

    /// Decode a field that may be absent or null.
    pub fn optional<T: DeserializeOwned>(&self, field: &str) -> ReelsmithResult<Option<T>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => decode(field, value).map(Some),
        }
    }

    pub(crate) fn insert(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    /// True once the terminal step has marked the job ready.
    pub fn is_ready(&self) -> bool {
        matches!(
            self.fields.get(fields::READY_TO_UPLOAD),
            Some(Value::Bool(true))
        )
    }

    /// Location of the published video, once it is in place.
    pub fn artifact_path(&self) -> Option<PathBuf> {
        if !self.is_ready() {
            return None;
        }
        self.fields
            .get(fields::VIDEO_PATH)
            .and_then(Value::as_str)
            .map(PathBuf::from)
    }

    /// First step whose outputs are not all populated.
    pub fn next_step<'a>(&self, registry: &'a StepRegistry) -> Option<&'a str> {
        registry
            .iter()
            .find(|step| !step.produces().iter().all(|f| self.is_populated(f)))
            .map(|step| step.name())
    }
}

fn decode<T: DeserializeOwned>(field: &str, value: &Value) -> ReelsmithResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| {
        PipelineError::new(PipelineErrorKind::FieldType {
            field: field.to_string(),
            message: e.to_string(),
        })
        .into()
    })
}
