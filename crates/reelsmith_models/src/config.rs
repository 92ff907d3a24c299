//! Collaborator settings, loaded from the `[models]` table.

use crate::CommandSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CompletionConfig {
    /// Chat completions URL
    #[serde(default = "default_completion_url")]
    base_url: String,
    /// Model name sent with every request
    #[serde(default = "default_completion_model")]
    model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_completion_key_env")]
    api_key_env: String,
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_completion_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            model: default_completion_model(),
            api_key_env: default_completion_key_env(),
        }
    }
}

/// Pexels stock media API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PexelsConfig {
    /// API root
    #[serde(default = "default_pexels_url")]
    base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_pexels_key_env")]
    api_key_env: String,
    /// Longest edge of the video file picked from each result
    #[serde(default = "default_max_video_edge")]
    max_video_edge: u32,
}

fn default_pexels_url() -> String {
    "https://api.pexels.com".to_string()
}

fn default_pexels_key_env() -> String {
    "PEXELS_API_KEY".to_string()
}

fn default_max_video_edge() -> u32 {
    1920
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            base_url: default_pexels_url(),
            api_key_env: default_pexels_key_env(),
            max_video_edge: default_max_video_edge(),
        }
    }
}

/// Speech synthesis and audio probing commands.
///
/// The synthesis template may use `{text}`, `{voice}`, `{language}` and
/// `{output}`; the probe template uses `{audio}` and must print seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct NarratorConfig {
    /// Text-to-speech command
    #[serde(default = "default_synthesize")]
    synthesize: CommandSpec,
    /// Duration probe command
    #[serde(default = "default_probe")]
    probe: CommandSpec,
    /// Voice per language name; unlisted languages use `default_voice`
    #[serde(default)]
    voices: BTreeMap<String, String>,
    /// Voice used when a language has no entry
    #[serde(default = "default_voice")]
    default_voice: String,
}

fn default_synthesize() -> CommandSpec {
    CommandSpec::new(
        "edge-tts",
        ["--voice", "{voice}", "--text", "{text}", "--write-media", "{output}"],
    )
}

fn default_probe() -> CommandSpec {
    CommandSpec::new(
        "ffprobe",
        [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            "{audio}",
        ],
    )
}

fn default_voice() -> String {
    "en-US-AriaNeural".to_string()
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            synthesize: default_synthesize(),
            probe: default_probe(),
            voices: BTreeMap::new(),
            default_voice: default_voice(),
        }
    }
}

/// Speech-to-text command printing word timings as JSON on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TranscriberConfig {
    /// Template using `{audio}`
    #[serde(default = "default_transcribe")]
    command: CommandSpec,
}

fn default_transcribe() -> CommandSpec {
    CommandSpec::new("whisper_timestamped", ["{audio}", "--output_format", "json", "--output_dir", "-"])
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            command: default_transcribe(),
        }
    }
}

/// Video compositor command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RendererConfig {
    /// Template using `{manifest}` (the render plan as JSON) and `{output}`
    #[serde(default = "default_render")]
    command: CommandSpec,
}

fn default_render() -> CommandSpec {
    CommandSpec::new("reelsmith-compose", ["--plan", "{manifest}", "--output", "{output}"])
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_render(),
        }
    }
}

/// Background music catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct MusicConfig {
    /// Directory searched for `<name>.mp3`, `.wav`, `.m4a` or `.ogg`
    #[serde(default)]
    directory: Option<PathBuf>,
    /// Explicit name to URL or path entries, checked first
    #[serde(default)]
    tracks: BTreeMap<String, String>,
}

/// Settings for every concrete collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ModelsConfig {
    /// Text completion
    #[serde(default)]
    completion: CompletionConfig,
    /// Stock images and footage
    #[serde(default)]
    pexels: PexelsConfig,
    /// Speech synthesis
    #[serde(default)]
    narrator: NarratorConfig,
    /// Speech-to-text
    #[serde(default)]
    transcriber: TranscriberConfig,
    /// Rendering
    #[serde(default)]
    renderer: RendererConfig,
    /// Background music
    #[serde(default)]
    music: MusicConfig,
}
