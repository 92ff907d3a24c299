//! Prompt templates for completion-backed steps.

use reelsmith_core::{Language, TimedEntry};

pub const SCRIPT_SYSTEM: &str = "You are an expert short-form video writer. You write punchy, \
factual narration scripts for vertical videos. Output only the narration text, with no title, \
no stage directions, no hashtags and no markdown.";

pub fn script(prompt: &str) -> String {
    format!(
        "Write a narration script presenting surprising, accurate facts.\n\
         Topic: {}\n\
         Start with a hook sentence. Keep sentences short and spoken-sounding.",
        prompt
    )
}

pub const TRANSLATE_SYSTEM: &str = "You are a professional translator for video narration. \
Preserve meaning and tone. Output only the translated text.";

pub fn translate(script: &str, language: Language) -> String {
    format!("Translate the following narration into {}:\n\n{}", language, script)
}

pub const IMAGE_QUERIES_SYSTEM: &str = "You pick still images that illustrate a narrated video. \
Answer with JSON only.";

pub fn image_queries(captions: &[TimedEntry<String>], count: usize, duration: f64) -> String {
    format!(
        "The video lasts {:.1} seconds. These are its timed captions as \
         [start, end, text]:\n{}\n\n\
         Choose {} moments where a picture of a specific, concrete thing mentioned \
         in the narration would help. For each, give the timestamp in seconds and a \
         2-4 word image search query naming that thing. Avoid bare numbers and \
         abstract words.\n\
         Respond with exactly this JSON shape:\n\
         {{\"image_queries\": [{{\"timestamp\": 2.5, \"query\": \"snow leopard cub\"}}]}}",
        duration,
        caption_lines(captions),
        count
    )
}

pub const VIDEO_SEARCH_SYSTEM: &str = "You pick stock footage for a narrated video. Queries must \
describe something visually filmable in English, one to three words each. Answer with JSON only.";

pub fn video_searches(captions: &[TimedEntry<String>], duration: f64) -> String {
    format!(
        "The video lasts {:.1} seconds. These are its timed captions as \
         [start, end, text]:\n{}\n\n\
         Split the whole duration into consecutive segments of 2 to 4 seconds. For \
         each segment give three stock footage search queries, most specific last.\n\
         Respond with exactly this JSON shape:\n\
         {{\"video_segments\": [{{\"time_range\": [0.0, 3.2], \"queries\": [\"forest\", \"snowy forest\", \"snow leopard walking\"]}}]}}",
        duration,
        caption_lines(captions)
    )
}

pub const METADATA_SYSTEM: &str = "You write YouTube metadata for short videos. Answer with \
JSON only.";

pub fn metadata(script: &str) -> String {
    format!(
        "Write a catchy title (under 80 characters, no hashtags) and a two-sentence \
         description for a short video with this narration:\n\n{}\n\n\
         Respond with exactly this JSON shape:\n\
         {{\"title\": \"...\", \"description\": \"...\"}}",
        script
    )
}

fn caption_lines(captions: &[TimedEntry<String>]) -> String {
    captions
        .iter()
        .map(|c| format!("[{:.2}, {:.2}, {:?}]", c.start, c.end, c.payload))
        .collect::<Vec<_>>()
        .join("\n")
}
