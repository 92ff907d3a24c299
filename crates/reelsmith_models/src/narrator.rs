//! Command-line speech synthesis.

use crate::{CommandSpec, NarratorConfig};
use async_trait::async_trait;
use reelsmith_core::Language;
use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reelsmith_interface::Narrator;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Narrator backed by a text-to-speech program and a duration probe.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    synthesize: CommandSpec,
    probe: CommandSpec,
    voices: BTreeMap<String, String>,
    default_voice: String,
}

impl CommandNarrator {
    /// Creates a narrator from configuration.
    pub fn new(config: &NarratorConfig) -> Self {
        Self {
            synthesize: config.synthesize().clone(),
            probe: config.probe().clone(),
            voices: config.voices().clone(),
            default_voice: config.default_voice().clone(),
        }
    }

    /// Voice configured for a language.
    pub fn voice_for(&self, language: Language) -> &str {
        let name = language.as_ref();
        self.voices
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, voice)| voice.as_str())
            .unwrap_or(&self.default_voice)
    }
}

#[async_trait]
impl Narrator for CommandNarrator {
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        output: &Path,
    ) -> ProviderResult<PathBuf> {
        let output_arg = output.to_string_lossy();
        let language_arg = language.to_string();
        self.synthesize
            .run(&[
                ("text", text),
                ("voice", self.voice_for(language)),
                ("language", language_arg.as_str()),
                ("output", &*output_arg),
            ])
            .await?;

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(ProviderError::new(ProviderErrorKind::Command {
                program: self.synthesize.program().clone(),
                message: format!("no audio written to {}", output.display()),
            }));
        }
        Ok(output.to_path_buf())
    }

    #[tracing::instrument(skip(self))]
    async fn duration(&self, audio: &Path) -> ProviderResult<f64> {
        let audio_arg = audio.to_string_lossy();
        let stdout = self.probe.run(&[("audio", &*audio_arg)]).await?;
        let text = String::from_utf8_lossy(&stdout);
        text.trim().parse::<f64>().map_err(|e| {
            ProviderError::new(ProviderErrorKind::InvalidResponse(format!(
                "duration probe printed '{}': {}",
                text.trim(),
                e
            )))
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn narrator(synthesize: CommandSpec, probe: CommandSpec) -> CommandNarrator {
        CommandNarrator {
            synthesize,
            probe,
            voices: BTreeMap::from([("Spanish".to_string(), "es-ES-ElviraNeural".to_string())]),
            default_voice: "en-US-AriaNeural".to_string(),
        }
    }

    fn silent() -> CommandSpec {
        CommandSpec::new("true", Vec::<String>::new())
    }

    #[test]
    fn test_voice_lookup() {
        let n = narrator(silent(), silent());
        assert_eq!(n.voice_for(Language::Spanish), "es-ES-ElviraNeural");
        assert_eq!(n.voice_for(Language::German), "en-US-AriaNeural");
    }

    #[tokio::test]
    async fn test_synthesize_and_measure() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("narration.wav");
        let n = narrator(
            CommandSpec::new(
                "sh",
                [
                    "-c",
                    "printf '%s|%s' \"$0\" \"$1\" > \"$2\"",
                    "{voice}",
                    "{text}",
                    "{output}",
                ],
            ),
            CommandSpec::new("sh", ["-c", "echo 12.75"]),
        );

        let written = n
            .synthesize("Owls hunt at night", Language::English, &output)
            .await
            .unwrap();
        assert_eq!(written, output);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "en-US-AriaNeural|Owls hunt at night"
        );
        assert_eq!(n.duration(&output).await.unwrap(), 12.75);
    }

    #[tokio::test]
    async fn test_silent_synthesizer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let n = narrator(silent(), silent());
        let err = n
            .synthesize("x", Language::English, &dir.path().join("missing.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::Command { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_duration() {
        let n = narrator(silent(), CommandSpec::new("echo", ["N/A"]));
        let err = n.duration(Path::new("a.wav")).await.unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::InvalidResponse(_)));
    }
}
