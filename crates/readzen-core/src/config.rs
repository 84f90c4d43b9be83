// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading preferences: the persisted configuration of a reader session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::phonemes::validate_entry;
use crate::types::{Font, ReadingAid, Theme};

/// Persistent reading preferences.
///
/// The JSON form is keyed exactly by the camelCase field names
/// (`syllableAlternation`, `activePhonemes`, ...). Missing keys fall back to
/// [`Preferences::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub font: Font,
    /// Split words into syllables.
    pub syllabic: bool,
    /// Cycle syllables through three alternating styles.
    pub syllable_alternation: bool,
    /// Underline each syllable.
    pub syllable_underline: bool,
    pub phonemes_enabled: bool,
    /// Grapheme → CSS colour. Keys are unique; order is irrelevant because
    /// precedence comes from the phoneme catalog.
    pub active_phonemes: BTreeMap<String, String>,
    pub silent_letters: bool,
    pub semantic_proper_nouns: bool,
    pub semantic_dates: bool,
    pub semantic_concepts: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font: Font::Default,
            syllabic: false,
            syllable_alternation: true,
            syllable_underline: false,
            phonemes_enabled: false,
            active_phonemes: BTreeMap::new(),
            silent_letters: false,
            semantic_proper_nouns: false,
            semantic_dates: false,
            semantic_concepts: false,
        }
    }
}

impl Preferences {
    /// Preferences with every reading aid switched off.
    ///
    /// Rendering with these returns the source text unchanged.
    pub fn plain() -> Self {
        let mut prefs = Self::default();
        for aid in ReadingAid::ALL {
            prefs.set_aid(aid, false);
        }
        prefs
    }

    /// Current state of a boolean reading aid.
    pub fn aid(&self, aid: ReadingAid) -> bool {
        match aid {
            ReadingAid::Syllabic => self.syllabic,
            ReadingAid::SyllableAlternation => self.syllable_alternation,
            ReadingAid::SyllableUnderline => self.syllable_underline,
            ReadingAid::Phonemes => self.phonemes_enabled,
            ReadingAid::SilentLetters => self.silent_letters,
            ReadingAid::SemanticProperNouns => self.semantic_proper_nouns,
            ReadingAid::SemanticDates => self.semantic_dates,
            ReadingAid::SemanticConcepts => self.semantic_concepts,
        }
    }

    pub fn set_aid(&mut self, aid: ReadingAid, enabled: bool) {
        let slot = match aid {
            ReadingAid::Syllabic => &mut self.syllabic,
            ReadingAid::SyllableAlternation => &mut self.syllable_alternation,
            ReadingAid::SyllableUnderline => &mut self.syllable_underline,
            ReadingAid::Phonemes => &mut self.phonemes_enabled,
            ReadingAid::SilentLetters => &mut self.silent_letters,
            ReadingAid::SemanticProperNouns => &mut self.semantic_proper_nouns,
            ReadingAid::SemanticDates => &mut self.semantic_dates,
            ReadingAid::SemanticConcepts => &mut self.semantic_concepts,
        };
        *slot = enabled;
    }

    /// Whether any semantic tagging flag is on.
    pub fn any_semantic(&self) -> bool {
        self.semantic_proper_nouns || self.semantic_dates || self.semantic_concepts
    }
}

/// Result of merging a stored blob over the defaults.
#[derive(Debug, Clone, Default)]
pub struct MergedPreferences {
    pub preferences: Preferences,
    /// Keys this version does not know about, kept verbatim so they can be
    /// written back untouched.
    pub unknown: Map<String, Value>,
}

/// Merge a stored JSON blob over [`Preferences::default`], key by key.
///
/// A known key is taken only when its value fits the field type; otherwise
/// that single field keeps its default. Anything that is not a JSON object
/// yields pure defaults.
pub fn merge_stored(blob: &Value) -> MergedPreferences {
    let Value::Object(stored) = blob else {
        debug!("stored preferences are not an object, using defaults");
        return MergedPreferences::default();
    };

    let mut merged = match serde_json::to_value(Preferences::default()) {
        Ok(Value::Object(map)) => map,
        _ => return MergedPreferences::default(),
    };
    let mut unknown = Map::new();

    for (key, value) in stored {
        if !merged.contains_key(key) {
            unknown.insert(key.clone(), value.clone());
            continue;
        }
        let previous = merged.insert(key.clone(), value.clone());
        if serde_json::from_value::<Preferences>(Value::Object(merged.clone())).is_err() {
            debug!(key = %key, "stored preference has an unexpected shape, keeping default");
            if let Some(previous) = previous {
                merged.insert(key.clone(), previous);
            }
        }
    }

    let mut preferences: Preferences = serde_json::from_value(Value::Object(merged)).unwrap_or_default();
    preferences.active_phonemes = normalize_phonemes(std::mem::take(&mut preferences.active_phonemes));
    MergedPreferences { preferences, unknown }
}

/// Apply the same rules as an interactive edit to a stored phoneme map.
///
/// Keys are lower-cased and entries that fail [`validate_entry`] are dropped.
/// When two keys differ only in case, the one already lower-case wins,
/// otherwise the first in map order.
fn normalize_phonemes(stored: BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (grapheme, color) in stored {
        if let Err(e) = validate_entry(&grapheme, &color) {
            debug!(grapheme = %grapheme, error = %e, "dropping stored phoneme entry");
            continue;
        }
        let key = grapheme.to_lowercase();
        if key == grapheme {
            out.insert(key, color);
        } else {
            out.entry(key).or_insert(color);
        }
    }
    out
}

/// Parse a stored blob string. Unparseable input yields pure defaults.
pub fn merge_stored_str(blob: &str) -> MergedPreferences {
    match serde_json::from_str::<Value>(blob) {
        Ok(value) => merge_stored(&value),
        Err(e) => {
            debug!(error = %e, "stored preferences are not valid JSON, using defaults");
            MergedPreferences::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_keys_match_field_names() {
        let value = serde_json::to_value(Preferences::default()).unwrap();
        let map = value.as_object().unwrap();
        for key in [
            "theme",
            "font",
            "syllabic",
            "syllableAlternation",
            "syllableUnderline",
            "phonemesEnabled",
            "activePhonemes",
            "silentLetters",
            "semanticProperNouns",
            "semanticDates",
            "semanticConcepts",
        ] {
            assert!(map.contains_key(key), "missing key {key}");
        }
        assert_eq!(map.len(), 11);
        assert_eq!(map["theme"], "light");
    }

    #[test]
    fn partial_blob_merges_over_defaults() {
        let merged = merge_stored(&json!({ "syllabic": true, "theme": "dark" }));
        assert!(merged.preferences.syllabic);
        assert_eq!(merged.preferences.theme, Theme::Dark);
        assert!(merged.preferences.syllable_alternation);
        assert!(merged.unknown.is_empty());
    }

    #[test]
    fn unknown_keys_are_kept_aside() {
        let merged = merge_stored(&json!({ "readingRuler": true, "silentLetters": true }));
        assert!(merged.preferences.silent_letters);
        assert_eq!(merged.unknown.get("readingRuler"), Some(&json!(true)));
    }

    #[test]
    fn mistyped_field_keeps_default_only_for_that_field() {
        let merged = merge_stored(&json!({ "font": "comic-sans", "semanticDates": true }));
        assert_eq!(merged.preferences.font, Font::Default);
        assert!(merged.preferences.semantic_dates);
    }

    #[test]
    fn stored_phonemes_follow_edit_rules() {
        let merged = merge_stored(&json!({
            "phonemesEnabled": true,
            "activePhonemes": {
                "an": "red; background-image: url(http://x/y)",
                "OU": "#4FC3F7",
                "On": "#111",
                "on": "#222",
                "a<": "#333",
            },
        }));
        let active = &merged.preferences.active_phonemes;
        assert_eq!(active.len(), 2);
        assert_eq!(active.get("ou").map(String::as_str), Some("#4FC3F7"));
        assert_eq!(active.get("on").map(String::as_str), Some("#222"));
        assert!(!active.contains_key("an"));
        assert!(merged.preferences.phonemes_enabled);
    }

    #[test]
    fn garbage_yields_defaults() {
        assert_eq!(merge_stored_str("{not json").preferences, Preferences::default());
        assert_eq!(merge_stored_str("[1, 2]").preferences, Preferences::default());
    }

    #[test]
    fn plain_switches_everything_off() {
        let prefs = Preferences::plain();
        assert!(ReadingAid::ALL.iter().all(|aid| !prefs.aid(*aid)));
    }
}
