//! Supported conversation languages.
//!
//! English and French have their own command tables; the remaining languages are
//! spoken and recognized in their own locale but dispatch through the English table.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    Amharic,
    Oromo,
    Tigrigna,
    Chinese,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::French,
        Language::Amharic,
        Language::Oromo,
        Language::Tigrigna,
        Language::Chinese,
    ];

    /// ISO 639-1 code. Unknown codes (including "auto") resolve to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Self::French,
            "am" => Self::Amharic,
            "om" => Self::Oromo,
            "ti" => Self::Tigrigna,
            "zh" => Self::Chinese,
            _ => Self::English,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::Amharic => "am",
            Self::Oromo => "om",
            Self::Tigrigna => "ti",
            Self::Chinese => "zh",
        }
    }

    /// Locale tag for speech recognizers.
    pub fn locale(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::French => "fr-FR",
            Self::Amharic => "am-ET",
            Self::Oromo => "om-ET",
            Self::Tigrigna => "ti-ET",
            Self::Chinese => "zh-CN",
        }
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
            Self::Amharic => "Amharic",
            Self::Oromo => "Oromo",
            Self::Tigrigna => "Tigrigna",
            Self::Chinese => "Chinese",
        }
    }

    /// Finds a language named in `text` (English or French names, lower-case input).
    pub fn find_named(text: &str) -> Option<Self> {
        const NAMES: &[(&str, Language)] = &[
            ("english", Language::English),
            ("anglais", Language::English),
            ("amharic", Language::Amharic),
            ("amharique", Language::Amharic),
            ("oromo", Language::Oromo),
            ("tigrigna", Language::Tigrigna),
            ("tigrinya", Language::Tigrigna),
            ("french", Language::French),
            ("français", Language::French),
            ("francais", Language::French),
            ("chinese", Language::Chinese),
            ("chinois", Language::Chinese),
        ];
        NAMES
            .iter()
            .find(|(name, _)| text.contains(name))
            .map(|(_, lang)| *lang)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), lang);
        }
        assert_eq!(Language::from_code("auto"), Language::English);
    }

    #[test]
    fn finds_language_names_in_text() {
        assert_eq!(Language::find_named("please speak french"), Some(Language::French));
        assert_eq!(Language::find_named("parle en anglais"), Some(Language::English));
        assert_eq!(Language::find_named("speak klingon"), None);
    }
}
