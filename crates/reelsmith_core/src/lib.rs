//! Core data types for the Reelsmith short-video pipeline.
//!
//! This crate provides the values passed between pipeline steps and external
//! collaborators: job identity, timed entries, resolved assets, transcripts
//! and render plans.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
pub mod fields;
mod job_id;
mod language;
mod render;
mod timed;
mod transcript;

pub use asset::{AspectRatio, ResolvedAsset};
pub use job_id::JobId;
pub use language::Language;
pub use render::{CaptionStyle, RenderLayer, RenderPlan};
pub use timed::TimedEntry;
pub use transcript::{Transcript, WordTiming};
