//! Command-line speech-to-text.

use crate::{CommandSpec, TranscriberConfig};
use async_trait::async_trait;
use reelsmith_core::{Transcript, WordTiming};
use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reelsmith_interface::Transcriber;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TranscriptDto {
    #[serde(default)]
    words: Vec<WordDto>,
    #[serde(default)]
    segments: Vec<SegmentDto>,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SegmentDto {
    #[serde(default)]
    words: Vec<WordDto>,
}

#[derive(Debug, Deserialize)]
struct WordDto {
    #[serde(alias = "text")]
    word: String,
    start: f64,
    end: f64,
}

/// Parse transcriber output.
///
/// Accepts a flat `{"words": [...]}` list or whisper-style
/// `{"segments": [{"words": [...]}]}`; words may name their text `word` or
/// `text`. Without an explicit `duration`, the last word's end is used.
///
/// # Examples
///
/// ```
/// use reelsmith_models::parse_transcript;
///
/// let transcript = parse_transcript(
///     r#"{"segments": [{"words": [{"text": "Owls", "start": 0.0, "end": 0.4}]}]}"#,
/// )
/// .unwrap();
/// assert_eq!(transcript.text(), "Owls");
/// assert_eq!(*transcript.duration(), 0.4);
/// ```
pub fn parse_transcript(json: &str) -> ProviderResult<Transcript> {
    let dto: TranscriptDto = serde_json::from_str(json).map_err(|e| {
        ProviderError::new(ProviderErrorKind::InvalidResponse(format!(
            "transcript is not valid JSON: {}",
            e
        )))
    })?;

    let words: Vec<WordTiming> = dto
        .words
        .into_iter()
        .chain(dto.segments.into_iter().flat_map(|s| s.words))
        .map(|w| WordTiming::new(w.word.trim(), w.start, w.end))
        .collect();

    let last_end = words.iter().map(|w| w.end).fold(0.0, f64::max);
    let duration = dto.duration.unwrap_or(last_end).max(last_end);
    Ok(Transcript::new(words, duration))
}

/// Transcriber backed by a program printing word timings as JSON.
#[derive(Debug, Clone)]
pub struct CommandTranscriber {
    command: CommandSpec,
}

impl CommandTranscriber {
    /// Creates a transcriber from configuration.
    pub fn new(config: &TranscriberConfig) -> Self {
        Self {
            command: config.command().clone(),
        }
    }
}

#[async_trait]
impl Transcriber for CommandTranscriber {
    #[tracing::instrument(skip(self))]
    async fn transcribe(&self, audio: &Path) -> ProviderResult<Transcript> {
        let audio_arg = audio.to_string_lossy();
        let stdout = self.command.run(&[("audio", &*audio_arg)]).await?;
        let transcript = parse_transcript(&String::from_utf8_lossy(&stdout))?;
        tracing::debug!(
            words = transcript.words().len(),
            duration = transcript.duration(),
            "Transcribed narration"
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_words_with_duration() {
        let transcript = parse_transcript(
            r#"{"words": [{"word": " can", "start": 0.4, "end": 0.6}, {"word": "Owls", "start": 0.0, "end": 0.4}], "duration": 1.0}"#,
        )
        .unwrap();
        assert_eq!(transcript.text(), "Owls can");
        assert_eq!(*transcript.duration(), 1.0);
    }

    #[test]
    fn test_duration_never_shorter_than_words() {
        let transcript =
            parse_transcript(r#"{"words": [{"word": "a", "start": 0.0, "end": 2.0}], "duration": 1.5}"#)
                .unwrap();
        assert_eq!(*transcript.duration(), 2.0);
    }

    #[test]
    fn test_garbage_is_invalid_response() {
        let err = parse_transcript("Traceback (most recent call last)").unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::InvalidResponse(_)));
    }
}
