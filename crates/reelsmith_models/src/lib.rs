//! Concrete collaborators for the Reelsmith pipeline.
//!
//! - [`OpenAiCompletion`]: any OpenAI-compatible chat completions endpoint
//! - [`PexelsImageSearch`] / [`PexelsVideoSearch`]: Pexels stock media
//! - [`CommandNarrator`], [`CommandTranscriber`], [`CommandRenderer`]:
//!   external programs driven through argument templates
//! - [`DirectoryMusicLibrary`]: named tracks from a table or a directory
//!
//! API keys are read from the environment variables named in
//! [`ModelsConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod http;
mod music;
mod narrator;
mod openai;
mod pexels;
mod renderer;
mod transcriber;

pub use command::CommandSpec;
pub use config::{
    CompletionConfig, ModelsConfig, MusicConfig, NarratorConfig, PexelsConfig, RendererConfig,
    TranscriberConfig,
};
pub use http::{request_error, status_error};
pub use music::DirectoryMusicLibrary;
pub use narrator::CommandNarrator;
pub use openai::{ChatMessage, ChatRequest, OpenAiCompletion};
pub use pexels::{PexelsImageSearch, PexelsVideoSearch};
pub use renderer::CommandRenderer;
pub use transcriber::{CommandTranscriber, parse_transcript};
