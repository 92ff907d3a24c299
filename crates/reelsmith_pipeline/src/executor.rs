//! Checkpointed step execution.

use crate::{JobSeed, JobState, StepContext, StepRegistry};
use reelsmith_checkpoint::CheckpointStore;
use reelsmith_core::{JobId, fields};
use reelsmith_error::{
    PersistenceError, PersistenceErrorKind, PipelineError, PipelineErrorKind, ReelsmithResult,
    StepError,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Report of one executor run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PipelineRun {
    /// Job that was run
    job_id: JobId,
    /// Steps whose bodies ran, in order
    executed: Vec<String>,
    /// Steps skipped because their outputs were already checkpointed
    skipped: Vec<String>,
    /// Published video, when the job reached its terminal step
    artifact: Option<PathBuf>,
}

impl PipelineRun {
    /// True when no step body ran.
    pub fn was_noop(&self) -> bool {
        self.executed.is_empty()
    }
}

/// Runs jobs through a step registry, checkpointing every step's outputs.
///
/// Steps run strictly in registry order, one at a time. A step whose outputs
/// are all populated is skipped without touching any collaborator. A failure
/// aborts the run and leaves the job resumable from its last completed step.
pub struct PipelineExecutor {
    registry: StepRegistry,
    store: Arc<dyn CheckpointStore>,
    context: StepContext,
}

impl PipelineExecutor {
    /// Create an executor for jobs seeded from a [`JobSeed`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegistry` if the registry breaks the ordering rules.
    pub fn new(
        registry: StepRegistry,
        store: Arc<dyn CheckpointStore>,
        context: StepContext,
    ) -> ReelsmithResult<Self> {
        Self::with_seeds(registry, fields::SEEDS, store, context)
    }

    /// Create an executor whose jobs start with `seeds` already populated.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegistry` if the registry breaks the ordering rules.
    pub fn with_seeds(
        registry: StepRegistry,
        seeds: &[&str],
        store: Arc<dyn CheckpointStore>,
        context: StepContext,
    ) -> ReelsmithResult<Self> {
        registry.validate(seeds)?;
        tracing::debug!(
            steps = registry.len(),
            store = store.backend_name(),
            "Created pipeline executor"
        );
        Ok(Self {
            registry,
            store,
            context,
        })
    }

    /// The step registry.
    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// The checkpoint store.
    pub fn store(&self) -> &Arc<dyn CheckpointStore> {
        &self.store
    }

    /// Create a job with a fresh id and checkpoint its seed fields.
    pub async fn create_job(&self, seed: &JobSeed) -> ReelsmithResult<JobState> {
        self.create_job_with_id(JobId::new(), seed).await
    }

    /// Create a job under a caller-chosen id.
    ///
    /// If the job already exists it is re-opened: existing fields win and
    /// only absent seed fields are written.
    #[tracing::instrument(skip(self, seed), fields(job_id = %job_id))]
    pub async fn create_job_with_id(&self, job_id: JobId, seed: &JobSeed) -> ReelsmithResult<JobState> {
        let seed_fields = seed.to_fields()?;
        let mut job = JobState::new(job_id.clone(), self.store.load(&job_id).await?);
        let reopened = !job.fields().is_empty();

        for (field, value) in seed_fields {
            if job.is_populated(&field) {
                continue;
            }
            self.store.set(&job_id, &field, value.clone()).await?;
            job.insert(&field, value);
        }

        tracing::info!(reopened, fields = job.fields().len(), "Job ready");
        Ok(job)
    }

    /// Re-open an existing job.
    ///
    /// # Errors
    ///
    /// Returns `UnknownJob` if nothing is checkpointed under `job_id`.
    pub async fn open_job(&self, job_id: &JobId) -> ReelsmithResult<JobState> {
        if !self.store.exists(job_id).await? {
            return Err(
                PersistenceError::new(PersistenceErrorKind::UnknownJob(job_id.to_string())).into(),
            );
        }
        let fields = self.store.load(job_id).await?;
        Ok(JobState::new(job_id.clone(), fields))
    }

    /// Open a job by id and run it.
    pub async fn resume(&self, job_id: &JobId) -> ReelsmithResult<PipelineRun> {
        let mut job = self.open_job(job_id).await?;
        self.run(&mut job).await
    }

    /// Run every unsatisfied step of `job` in order.
    ///
    /// # Errors
    ///
    /// - `MissingField` when a step's precondition does not hold
    /// - `MissingOutput` / `UndeclaredOutput` when a body breaks its contract
    /// - [`StepError`] wrapping any failure raised inside a step body
    /// - persistence errors from the checkpoint store
    #[tracing::instrument(skip(self, job), fields(job_id = %job.job_id(), steps = self.registry.len()))]
    pub async fn run(&self, job: &mut JobState) -> ReelsmithResult<PipelineRun> {
        let job_id = job.job_id().clone();
        let mut executed = Vec::new();
        let mut skipped = Vec::new();

        for step in self.registry.iter() {
            let name = step.name();

            if step.produces().iter().all(|f| job.is_populated(f)) {
                tracing::debug!(step = name, "Outputs already checkpointed, skipping");
                skipped.push(name.to_string());
                continue;
            }

            if let Some(missing) = step.requires().iter().find(|f| !job.is_populated(f)) {
                tracing::error!(step = name, field = missing, "Precondition failed");
                return Err(PipelineError::new(PipelineErrorKind::MissingField {
                    job_id: job_id.to_string(),
                    step: name.to_string(),
                    field: missing.to_string(),
                })
                .into());
            }

            tracing::info!(step = name, "Running step");
            let started = Instant::now();

            let output = step
                .run(&self.context, job)
                .await
                .map_err(|e| {
                    tracing::error!(step = name, error = %e, "Step failed");
                    StepError::new(job_id.to_string(), name, e)
                })?;

            if let Some(field) = step.produces().iter().find(|f| !output.contains(f)) {
                return Err(PipelineError::new(PipelineErrorKind::MissingOutput {
                    step: name.to_string(),
                    field: field.to_string(),
                })
                .into());
            }
            if let Some(field) = output
                .field_names()
                .find(|f| !step.produces().iter().any(|p| p == f))
            {
                return Err(PipelineError::new(PipelineErrorKind::UndeclaredOutput {
                    step: name.to_string(),
                    field: field.to_string(),
                })
                .into());
            }

            for (field, value) in output.into_fields() {
                // A field, once written, is kept until explicitly cleared
                if job.is_populated(&field) {
                    continue;
                }
                self.store.set(&job_id, &field, value.clone()).await?;
                job.insert(&field, value);
            }

            tracing::info!(
                step = name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Step completed"
            );
            executed.push(name.to_string());
        }

        let run = PipelineRun {
            job_id,
            executed,
            skipped,
            artifact: job.artifact_path(),
        };
        tracing::info!(
            executed = run.executed.len(),
            skipped = run.skipped.len(),
            ready = job.is_ready(),
            "Pipeline run finished"
        );
        Ok(run)
    }
}
