//! Narration languages.

use serde::{Deserialize, Serialize};

/// Language the narration is spoken in.
///
/// Scripts are written in English; any other language is translated before
/// synthesis. Arabic switches captions to right-to-left styles.
///
/// # Examples
///
/// ```
/// use reelsmith_core::Language;
///
/// let lang: Language = "arabic".parse().unwrap();
/// assert_eq!(lang, Language::Arabic);
/// assert_eq!(lang.to_string(), "Arabic");
/// assert!(Language::default().is_english());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Language {
    /// English (no translation)
    #[default]
    English,
    /// Spanish
    Spanish,
    /// French
    French,
    /// Arabic
    Arabic,
    /// German
    German,
    /// Polish
    Polish,
    /// Italian
    Italian,
    /// Portuguese
    Portuguese,
    /// Hindi
    Hindi,
    /// Japanese
    Japanese,
    /// Korean
    Korean,
    /// Chinese
    Chinese,
    /// Russian
    Russian,
    /// Turkish
    Turkish,
    /// Dutch
    Dutch,
    /// Indonesian
    Indonesian,
    /// Vietnamese
    Vietnamese,
}

impl Language {
    /// True when no translation is needed.
    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }

    /// True when captions need the right-to-left style.
    pub fn is_arabic(&self) -> bool {
        matches!(self, Language::Arabic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for lang in Language::iter() {
            let parsed: Language = lang.to_string().parse().unwrap();
            assert_eq!(parsed, lang);
        }
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Language::Arabic).unwrap();
        assert_eq!(json, "\"Arabic\"");
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!("klingon".parse::<Language>().is_err());
    }
}
