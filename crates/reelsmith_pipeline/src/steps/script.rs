//! Script generation, length guard and translation.

use super::step_failed;
use crate::{JobState, Step, StepContext, StepOutput, prompts};
use async_trait::async_trait;
use reelsmith_core::{Language, fields};
use reelsmith_error::ReelsmithResult;
use reelsmith_interface::CompletionRequest;

/// Writes a facts-style script from `script_prompt`.
///
/// Skipped whenever a script was seeded.
pub struct GenerateScript;

#[async_trait]
impl Step for GenerateScript {
    fn name(&self) -> &'static str {
        "generate_script"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::SCRIPT_PROMPT]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::SCRIPT]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let topic: String = job.get(fields::SCRIPT_PROMPT)?;
        let prompt = format!("{}{}", topic.trim(), ctx.config().script_suffix());

        let request = CompletionRequest::builder()
            .prompt(prompts::script(&prompt))
            .system(Some(prompts::SCRIPT_SYSTEM.to_string()))
            .temperature(1.0)
            .build()
            .map_err(|e| step_failed(self.name(), e.to_string()))?;

        let script = ctx.complete_text(&request).await?.trim().to_string();
        if script.is_empty() {
            return Err(step_failed(self.name(), "completion returned an empty script"));
        }

        tracing::info!(words = script.split_whitespace().count(), "Generated script");
        StepOutput::new().with(fields::SCRIPT, script)
    }
}

/// First `max_words` words of `script` plus `"..."` when it is longer.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::steps::guard_word_count;
///
/// assert_eq!(guard_word_count("one two three", 2), "one two...");
/// assert_eq!(guard_word_count("one two", 2), "one two");
/// ```
pub fn guard_word_count(script: &str, max_words: usize) -> String {
    let words: Vec<&str> = script.split_whitespace().collect();
    if words.len() <= max_words {
        return script.trim().to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}

/// Truncates over-long scripts so the narration fits the video.
pub struct GuardScriptLength;

#[async_trait]
impl Step for GuardScriptLength {
    fn name(&self) -> &'static str {
        "guard_script_length"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::SCRIPT]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::NARRATION_SCRIPT]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let script: String = job.get(fields::SCRIPT)?;
        let max_words = *ctx.config().max_script_words();
        let guarded = guard_word_count(&script, max_words);

        if guarded != script.trim() {
            tracing::warn!(
                words = script.split_whitespace().count(),
                max_words,
                "Script exceeds recommended length, trimming"
            );
        }
        StepOutput::new().with(fields::NARRATION_SCRIPT, guarded)
    }
}

/// Translates the narration when the job's language is not English.
pub struct TranslateScript;

#[async_trait]
impl Step for TranslateScript {
    fn name(&self) -> &'static str {
        "translate_script"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::NARRATION_SCRIPT, fields::LANGUAGE]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::SPOKEN_SCRIPT]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let script: String = job.get(fields::NARRATION_SCRIPT)?;
        let language: Language = job.get(fields::LANGUAGE)?;

        if language.is_english() {
            return StepOutput::new().with(fields::SPOKEN_SCRIPT, script);
        }

        let request = CompletionRequest::builder()
            .prompt(prompts::translate(&script, language))
            .system(Some(prompts::TRANSLATE_SYSTEM.to_string()))
            .temperature(0.3)
            .build()
            .map_err(|e| step_failed(self.name(), e.to_string()))?;

        let translated = ctx.complete_text(&request).await?.trim().to_string();
        if translated.is_empty() {
            return Err(step_failed(self.name(), "completion returned an empty translation"));
        }

        tracing::info!(%language, "Translated script");
        StepOutput::new().with(fields::SPOKEN_SCRIPT, translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clamps_to_exact_word_count() {
        let script = (1..=150).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let guarded = guard_word_count(&script, 90);
        assert_eq!(guarded.split_whitespace().count(), 90);
        assert!(guarded.ends_with("w90..."));
    }

    #[test]
    fn test_guard_keeps_short_scripts() {
        assert_eq!(guard_word_count("  short script \n", 90), "short script");
    }
}
