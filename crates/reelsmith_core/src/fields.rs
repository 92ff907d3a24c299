//! Names of job fields shared by seeds, steps and the checkpoint store.

/// Topic for a generated script (seed)
pub const SCRIPT_PROMPT: &str = "script_prompt";
/// Source script, seeded or generated
pub const SCRIPT: &str = "script";
/// Narration language (seed)
pub const LANGUAGE: &str = "language";
/// Vertical output flag (seed)
pub const FORMAT_VERTICAL: &str = "format_vertical";
/// Background music name (seed)
pub const BACKGROUND_MUSIC_NAME: &str = "background_music_name";

/// Script after the word-count guard
pub const NARRATION_SCRIPT: &str = "narration_script";
/// Script in the narration language
pub const SPOKEN_SCRIPT: &str = "spoken_script";
/// Synthesized voice-over file
pub const AUDIO_PATH: &str = "audio_path";
/// Voice-over length in seconds
pub const VOICEOVER_DURATION: &str = "voiceover_duration";
/// Caption timeline
pub const TIMED_CAPTIONS: &str = "timed_captions";
/// Detected subject of the video, possibly null
pub const MAIN_TOPIC: &str = "main_topic";
/// Image overlay queries with their timing
pub const IMAGE_QUERIES: &str = "image_queries";
/// Stock footage queries per segment
pub const TIMED_VIDEO_SEARCHES: &str = "timed_video_searches";
/// Chosen footage per segment
pub const TIMED_VIDEO_URLS: &str = "timed_video_urls";
/// Chosen image per overlay
pub const TIMED_IMAGE_URLS: &str = "timed_image_urls";
/// Music track URL, possibly null
pub const BACKGROUND_MUSIC_URL: &str = "background_music_url";
/// Renderer output before publishing
pub const RENDERED_VIDEO_PATH: &str = "rendered_video_path";
/// Published title
pub const TITLE: &str = "title";
/// Published description
pub const DESCRIPTION: &str = "description";
/// Final artifact location
pub const VIDEO_PATH: &str = "video_path";
/// Terminal flag
pub const READY_TO_UPLOAD: &str = "ready_to_upload";

/// Fields a caller may supply when creating a job.
pub const SEEDS: &[&str] = &[
    SCRIPT_PROMPT,
    SCRIPT,
    LANGUAGE,
    FORMAT_VERTICAL,
    BACKGROUND_MUSIC_NAME,
];
