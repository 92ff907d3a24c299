//! Checkpoint storage for Reelsmith jobs.
//!
//! A checkpoint holds the populated fields of one job. Steps write their
//! outputs through a [`CheckpointStore`] before the executor advances, so an
//! interrupted job resumes from the last completed step.
//!
//! # Backends
//!
//! - [`FileCheckpointStore`]: one JSON document per job on local disk
//! - [`MemoryCheckpointStore`]: process-local map, for tests and dry runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod file;
mod memory;
mod store;

pub use document::CheckpointDocument;
pub use file::FileCheckpointStore;
pub use memory::MemoryCheckpointStore;
pub use store::{CheckpointStore, FieldMap};
