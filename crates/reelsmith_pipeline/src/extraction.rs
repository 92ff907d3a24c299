//! Pulling structured data out of completion text.
//!
//! Completion providers wrap JSON in markdown fences or surround it with
//! prose. These helpers find the payload before it is decoded.

use reelsmith_error::ParseError;
use serde::de::DeserializeOwned;

/// Extract a JSON document from a completion that may contain other text.
///
/// Tries, in order: a fenced code block, the first balanced `{...}` object,
/// the first balanced `[...]` array.
///
/// # Errors
///
/// Returns [`ParseError`] if no candidate is found.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::extract_json;
///
/// let response = "Sure! Here it is:\n```json\n{\"title\": \"Owls\"}\n```";
/// assert_eq!(extract_json(response).unwrap(), "{\"title\": \"Owls\"}");
///
/// let inline = "Result: {\"a\": {\"b\": \"}\"}} trailing";
/// assert_eq!(extract_json(inline).unwrap(), "{\"a\": {\"b\": \"}\"}}");
/// ```
pub fn extract_json(response: &str) -> Result<String, ParseError> {
    if let Some(fenced) = fenced_block(response) {
        let trimmed = fenced.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return Ok(trimmed.to_string());
        }
        if let Some(inner) = balanced(trimmed, '{', '}') {
            return Ok(inner.to_string());
        }
    }

    if let Some(object) = balanced(response, '{', '}') {
        return Ok(object.to_string());
    }
    if let Some(array) = balanced(response, '[', ']') {
        return Ok(array.to_string());
    }

    tracing::warn!(response_length = response.len(), "No JSON found in completion");
    Err(ParseError::new(format!(
        "no JSON found in completion (length: {})",
        response.len()
    )))
}

/// Extract and decode a JSON document.
///
/// # Errors
///
/// Returns [`ParseError`] when nothing JSON-like is found or it does not
/// decode into `T`.
pub fn parse_json<T: DeserializeOwned>(response: &str) -> Result<T, ParseError> {
    let json = extract_json(response)?;
    serde_json::from_str(&json).map_err(|e| ParseError::new(format!("invalid JSON: {}", e)))
}

/// Content of the first ``` fenced block, with any language tag removed.
fn fenced_block(response: &str) -> Option<&str> {
    let start = response.find("```")? + 3;
    let body_start = response[start..]
        .find('\n')
        .map(|n| start + n + 1)
        .unwrap_or(start);
    let body = &response[body_start..];
    // Truncated responses may lack the closing fence
    Some(body.find("```").map(|end| &body[..end]).unwrap_or(body))
}

/// First balanced `open ... close` span, ignoring delimiters inside strings.
fn balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
