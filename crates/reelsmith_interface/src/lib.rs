//! Trait definitions for the external collaborators of the Reelsmith pipeline.
//!
//! The pipeline consumes each collaborator through a narrow async trait so
//! steps can be exercised against in-process fakes. Concrete implementations
//! live in `reelsmith_models`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod request;
mod traits;

pub use request::{CompletionRequest, CompletionRequestBuilder};
pub use traits::{AssetSearchProvider, CompletionProvider, MusicLibrary, Narrator, Renderer, Transcriber};
