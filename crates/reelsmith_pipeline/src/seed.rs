//! Caller-supplied job inputs.

use reelsmith_checkpoint::FieldMap;
use reelsmith_core::{Language, fields};
use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inputs for a new job.
///
/// Either a finished `script` or a `script_prompt` to generate one from is
/// required.
///
/// # Examples
///
/// ```
/// use reelsmith_core::Language;
/// use reelsmith_pipeline::JobSeed;
///
/// let seed = JobSeed::builder()
///     .script("Owls can rotate their heads 270 degrees.")
///     .format_vertical(true)
///     .language(Language::Spanish)
///     .build()
///     .unwrap();
/// assert!(*seed.format_vertical());
///
/// assert!(JobSeed::builder().build().is_err());
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
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct JobSeed {
    /// Finished script
    #[builder(default, setter(into, strip_option))]
    script: Option<String>,
    /// Topic to generate a script from
    #[builder(default, setter(into, strip_option))]
    script_prompt: Option<String>,
    /// Narration language
    #[builder(default)]
    language: Language,
    /// Render 1080x1920 instead of 1920x1080
    #[builder(default)]
    format_vertical: bool,
    /// Background music track name
    #[builder(default, setter(into, strip_option))]
    background_music_name: Option<String>,
}

impl JobSeedBuilder {
    fn validate(&self) -> Result<(), String> {
        let has = |field: &Option<Option<String>>| {
            field
                .as_ref()
                .and_then(|inner| inner.as_deref())
                .is_some_and(|text| !text.trim().is_empty())
        };
        if has(&self.script) || has(&self.script_prompt) {
            Ok(())
        } else {
            Err("either a script or a script prompt is required".to_string())
        }
    }
}

impl JobSeed {
    /// Creates a new seed builder.
    pub fn builder() -> JobSeedBuilder {
        JobSeedBuilder::default()
    }

    /// The seed as checkpoint fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSeed` when neither a script nor a prompt is present.
    pub fn to_fields(&self) -> ReelsmithResult<FieldMap> {
        let script = non_blank(self.script.as_deref());
        let prompt = non_blank(self.script_prompt.as_deref());
        if script.is_none() && prompt.is_none() {
            return Err(PipelineError::new(PipelineErrorKind::InvalidSeed(
                "either a script or a script prompt is required".to_string(),
            ))
            .into());
        }

        let mut map = FieldMap::new();
        if let Some(script) = script {
            map.insert(fields::SCRIPT.to_string(), Value::from(script));
        }
        if let Some(prompt) = prompt {
            map.insert(fields::SCRIPT_PROMPT.to_string(), Value::from(prompt));
        }
        map.insert(
            fields::LANGUAGE.to_string(),
            Value::from(self.language.to_string()),
        );
        map.insert(
            fields::FORMAT_VERTICAL.to_string(),
            Value::Bool(self.format_vertical),
        );
        if let Some(name) = non_blank(self.background_music_name.as_deref()) {
            map.insert(fields::BACKGROUND_MUSIC_NAME.to_string(), Value::from(name));
        }
        Ok(map)
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_from_script_seed() {
        let seed = JobSeed::builder()
            .script("  Owls are great.  ")
            .build()
            .unwrap();
        let map = seed.to_fields().unwrap();
        assert_eq!(map[fields::SCRIPT], "Owls are great.");
        assert_eq!(map[fields::LANGUAGE], "English");
        assert_eq!(map[fields::FORMAT_VERTICAL], false);
        assert!(!map.contains_key(fields::SCRIPT_PROMPT));
        assert!(!map.contains_key(fields::BACKGROUND_MUSIC_NAME));
    }

    #[test]
    fn test_blank_script_rejected() {
        assert!(JobSeed::builder().script("   ").build().is_err());
    }

    #[test]
    fn test_prompt_and_music() {
        let seed = JobSeed::builder()
            .script_prompt("Facts about octopuses")
            .background_music_name("calm")
            .build()
            .unwrap();
        let map = seed.to_fields().unwrap();
        assert_eq!(map[fields::SCRIPT_PROMPT], "Facts about octopuses");
        assert_eq!(map[fields::BACKGROUND_MUSIC_NAME], "calm");
    }
}
