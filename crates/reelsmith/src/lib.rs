//! Reelsmith - checkpointed short-video production
//!
//! Reelsmith turns a script (or a topic to write one about) into a narrated,
//! captioned short video illustrated with stock footage and stills. Every
//! step checkpoints its outputs, so an interrupted job resumes where it
//! stopped and a finished job re-runs as a no-op.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reelsmith::{JobSeed, ReelsmithConfig, build_executor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ReelsmithConfig::load()?;
//!     let executor = build_executor(&config)?;
//!
//!     let seed = JobSeed::builder()
//!         .script_prompt("five facts about owls")
//!         .format_vertical(true)
//!         .build()?;
//!     let mut job = executor.create_job(&seed).await?;
//!     let run = executor.run(&mut job).await?;
//!     println!("Published {:?}", run.artifact());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `reelsmith_error` - Error types
//! - `reelsmith_core` - Job ids, timed entries, assets, render plans
//! - `reelsmith_interface` - Collaborator traits
//! - `reelsmith_checkpoint` - Per-job field persistence
//! - `reelsmith_resolver` - Stock asset lookup with query repair
//! - `reelsmith_pipeline` - Step registry, executor and the video steps
//! - `reelsmith_models` - OpenAI, Pexels and command-line collaborators
//!
//! This crate re-exports everything and adds configuration loading, logging
//! setup and the `reelsmith` binary.

mod assemble;
mod config;
mod jobs;
mod logging;

pub use assemble::{build_context, build_executor, build_executor_with, build_store};
pub use config::{DEFAULT_CONFIG, ReelsmithConfig, ResolverSections};
pub use jobs::{JobStatus, clear_job_field, job_status};
pub use logging::{LoggingConfig, init_logging};

pub use reelsmith_checkpoint::*;
pub use reelsmith_core::*;
pub use reelsmith_error::*;
pub use reelsmith_interface::*;
pub use reelsmith_models::*;
pub use reelsmith_pipeline::*;
pub use reelsmith_resolver::*;
