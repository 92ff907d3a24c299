//! Caption packing.

use reelsmith_core::{TimedEntry, WordTiming};

/// Greedily pack transcribed words into captions of at most `max_chars`
/// characters.
///
/// A word longer than the limit forms a caption of its own. Each caption
/// spans from its first word's start to its last word's end, clamped to
/// `[0, total]`. Captions starting at or after `total` are dropped, and a
/// zero-length span is widened to 0.1 s where `total` allows.
///
/// # Examples
///
/// ```
/// use reelsmith_core::WordTiming;
/// use reelsmith_pipeline::pack_captions;
///
/// let words = vec![
///     WordTiming::new("Owls", 0.0, 0.4),
///     WordTiming::new("can", 0.4, 0.6),
///     WordTiming::new("turn", 0.6, 0.9),
///     WordTiming::new("heads", 0.9, 1.3),
/// ];
/// let captions = pack_captions(&words, 10, 1.3);
/// assert_eq!(captions.len(), 2);
/// assert_eq!(captions[0].payload, "Owls can");
/// assert_eq!(captions[1].payload, "turn heads");
/// assert_eq!((captions[1].start, captions[1].end), (0.6, 1.3));
/// ```
pub fn pack_captions(words: &[WordTiming], max_chars: usize, total: f64) -> Vec<TimedEntry<String>> {
    let mut captions = Vec::new();
    let mut text = String::new();
    let mut start = 0.0;
    let mut end = 0.0;

    for word in words {
        let token = word.word.trim();
        if token.is_empty() {
            continue;
        }

        if text.is_empty() {
            text.push_str(token);
            start = word.start;
            end = word.end;
            continue;
        }

        let joined_len = text.chars().count() + 1 + token.chars().count();
        if joined_len <= max_chars {
            text.push(' ');
            text.push_str(token);
            end = word.end;
        } else {
            captions.extend(span(std::mem::take(&mut text), start, end, total));
            text.push_str(token);
            start = word.start;
            end = word.end;
        }
    }

    if !text.is_empty() {
        captions.extend(span(text, start, end, total));
    }
    captions
}

fn span(text: String, start: f64, end: f64, total: f64) -> Option<TimedEntry<String>> {
    let start = start.max(0.0);
    if total.is_nan() || start >= total {
        return None;
    }
    let mut end = end.min(total);
    if end.is_nan() || end <= start {
        end = (start + 0.1).min(total);
    }
    Some(TimedEntry::new(start, end, text))
}
