//! Languages and localized text maps.
//!
//! Products, ingredients, and extras carry their display text as a map of
//! language to [`TranslationEntry`]. Lookup falls back Spanish -> English so
//! a missing translation never produces an empty card.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish - the restaurant's primary language.
    #[default]
    Es,
    /// English.
    En,
}

impl Language {
    /// Fallback order used when a translation is missing.
    const FALLBACK: [Self; 2] = [Self::Es, Self::En];

    /// The language's lowercase code, as used in API payloads.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

/// Which localized field to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Description,
}

/// Localized text for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TranslationEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Map of language to localized text, as embedded in backend snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Translations(BTreeMap<Language, TranslationEntry>);

impl Translations {
    /// Build a translations map from (language, entry) pairs.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (Language, TranslationEntry)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Look up a field in exactly the requested language.
    #[must_use]
    pub fn get(&self, language: Language, field: TextField) -> Option<&str> {
        let entry = self.0.get(&language)?;
        match field {
            TextField::Name => (!entry.name.is_empty()).then_some(entry.name.as_str()),
            TextField::Description => entry.description.as_deref(),
        }
    }

    /// Look up a field, falling back Spanish -> English, then empty.
    #[must_use]
    pub fn resolve(&self, language: Language, field: TextField) -> &str {
        if let Some(text) = self.get(language, field) {
            return text;
        }
        for fallback in Language::FALLBACK {
            if fallback == language {
                continue;
            }
            if let Some(text) = self.get(fallback, field) {
                return text;
            }
        }
        ""
    }

    /// Convenience constructor for a name-only translations map.
    #[must_use]
    pub fn named(es: &str, en: &str) -> Self {
        Self::from_entries([
            (
                Language::Es,
                TranslationEntry {
                    name: es.to_string(),
                    description: None,
                },
            ),
            (
                Language::En,
                TranslationEntry {
                    name: en.to_string(),
                    description: None,
                },
            ),
        ])
    }
}
