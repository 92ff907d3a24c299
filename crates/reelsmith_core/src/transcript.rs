//! Word-level transcription output.

use serde::{Deserialize, Serialize};

/// One spoken word with its timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// The word as transcribed
    pub word: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl WordTiming {
    /// Create a word timing.
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// Transcriber output for a narration track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Transcript {
    /// Words in spoken order
    words: Vec<WordTiming>,
    /// Duration of the audio in seconds
    duration: f64,
}

impl Transcript {
    /// Create a transcript.
    ///
    /// Words are sorted by start time.
    pub fn new(mut words: Vec<WordTiming>, duration: f64) -> Self {
        words.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { words, duration }
    }

    /// Full text with single spaces between words.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.word.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
