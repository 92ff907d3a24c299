//! Checkpointed pipeline execution for Reelsmith.
//!
//! A job is a bag of named fields. Steps declare which fields they require
//! and which they produce; the [`PipelineExecutor`] walks the
//! [`StepRegistry`] in order, skips steps whose outputs are already
//! checkpointed, verifies preconditions, runs the step body and persists its
//! outputs before advancing.
//!
//! [`video_registry`] assembles the fourteen steps that turn a script into a
//! published short video.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelsmith_pipeline::{JobSeed, PipelineExecutor, video_registry};
//!
//! let executor = PipelineExecutor::new(video_registry(), store, context)?;
//! let seed = JobSeed::builder().script("Five facts about owls").build()?;
//! let mut job = executor.create_job(&seed).await?;
//! let run = executor.run(&mut job).await?;
//! println!("Video at {:?}", run.artifact());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod captions;
mod config;
mod context;
mod executor;
mod extraction;
mod job;
mod prompts;
mod registry;
mod seed;
mod step;
pub mod steps;
mod topic;

pub use captions::pack_captions;
pub use config::PipelineConfig;
pub use context::{StepContext, StepContextBuilder};
pub use executor::{PipelineExecutor, PipelineRun};
pub use extraction::{extract_json, parse_json};
pub use job::JobState;
pub use registry::StepRegistry;
pub use seed::{JobSeed, JobSeedBuilder};
pub use step::{Step, StepOutput};
pub use steps::video_registry;
pub use topic::{TopicRule, detect_main_topic, is_generic_query};
