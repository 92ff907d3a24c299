//! Completion request type.

use serde::{Deserialize, Serialize};

/// A single-turn completion request.
///
/// # Examples
///
/// ```
/// use reelsmith_interface::CompletionRequest;
///
/// let request = CompletionRequest::builder()
///     .prompt("Five facts about the Hyundai Genesis")
///     .system(Some("You write short video scripts.".to_string()))
///     .temperature(1.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.temperature(), 1.0);
/// assert!(request.system().is_some());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// User prompt
    prompt: String,
    /// Optional system prompt
    #[builder(default)]
    system: Option<String>,
    /// Sampling temperature
    #[builder(default = "0.7")]
    temperature: f32,
}

impl CompletionRequest {
    /// Creates a new request builder.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }

    /// A request with only a user prompt and default temperature.
    pub fn prompt_only(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: 0.7,
        }
    }
}
