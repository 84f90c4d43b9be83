// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading profiles: named bundles of preferences applied in one step.
//
// A profile covers theme, font, the syllable family, the phoneme switch and
// silent letters. It never touches the `activePhonemes` map or the semantic
// flags, so a user's colour choices and tagging survive a profile change.

use crate::config::Preferences;
use crate::error::{ReaderError, Result};
use crate::types::{Font, Theme};

/// The fields a profile overwrites. Every field is mandatory so applying a
/// patch is a full overwrite, never a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilePatch {
    pub theme: Theme,
    pub font: Font,
    pub syllabic: bool,
    pub syllable_alternation: bool,
    pub syllable_underline: bool,
    pub phonemes_enabled: bool,
    pub silent_letters: bool,
}

impl ProfilePatch {
    pub fn apply_to(&self, prefs: &mut Preferences) {
        prefs.theme = self.theme;
        prefs.font = self.font;
        prefs.syllabic = self.syllabic;
        prefs.syllable_alternation = self.syllable_alternation;
        prefs.syllable_underline = self.syllable_underline;
        prefs.phonemes_enabled = self.phonemes_enabled;
        prefs.silent_letters = self.silent_letters;
    }
}

/// A named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub id: &'static str,
    pub label: &'static str,
    pub patch: ProfilePatch,
}

const CATALOG: &[Profile] = &[
    Profile {
        id: "dyslexia-friendly",
        label: "Dyslexia friendly",
        patch: ProfilePatch {
            theme: Theme::Sepia,
            font: Font::Dyslexic,
            syllabic: true,
            syllable_alternation: true,
            syllable_underline: false,
            phonemes_enabled: true,
            silent_letters: true,
        },
    },
    Profile {
        id: "low-vision",
        label: "Low vision",
        patch: ProfilePatch {
            theme: Theme::Dark,
            font: Font::Lexend,
            syllabic: false,
            syllable_alternation: false,
            syllable_underline: false,
            phonemes_enabled: false,
            silent_letters: false,
        },
    },
    Profile {
        id: "attention-support",
        label: "Attention support",
        patch: ProfilePatch {
            theme: Theme::Light,
            font: Font::Lexend,
            syllabic: true,
            syllable_alternation: true,
            syllable_underline: true,
            phonemes_enabled: false,
            silent_letters: false,
        },
    },
    Profile {
        id: "fatigue",
        label: "Visual fatigue",
        patch: ProfilePatch {
            theme: Theme::Sepia,
            font: Font::Default,
            syllabic: false,
            syllable_alternation: false,
            syllable_underline: false,
            phonemes_enabled: false,
            silent_letters: false,
        },
    },
    Profile {
        id: "speed-reading",
        label: "Speed reading",
        patch: ProfilePatch {
            theme: Theme::Light,
            font: Font::Default,
            syllabic: false,
            syllable_alternation: false,
            syllable_underline: false,
            phonemes_enabled: false,
            silent_letters: false,
        },
    },
];

/// Fixed catalog of reading profiles.
pub struct ProfilePresets;

impl ProfilePresets {
    pub fn all() -> &'static [Profile] {
        CATALOG
    }

    pub fn find(id: &str) -> Option<&'static Profile> {
        CATALOG.iter().find(|p| p.id == id)
    }

    /// Overwrite the covered fields of `prefs` with the named profile.
    ///
    /// Leaves `prefs` untouched and returns [`ReaderError::UnknownProfile`]
    /// when the id is not in the catalog.
    pub fn apply_to(id: &str, prefs: &mut Preferences) -> Result<&'static Profile> {
        let profile = Self::find(id).ok_or_else(|| ReaderError::UnknownProfile(id.to_string()))?;
        profile.patch.apply_to(prefs);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<&str> = ProfilePresets::all().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ProfilePresets::all().len());
    }

    #[test]
    fn apply_overwrites_covered_fields() {
        let mut prefs = Preferences::default();
        prefs.syllable_underline = true;
        ProfilePresets::apply_to("dyslexia-friendly", &mut prefs).unwrap();
        assert_eq!(prefs.theme, Theme::Sepia);
        assert_eq!(prefs.font, Font::Dyslexic);
        assert!(prefs.syllabic);
        assert!(prefs.silent_letters);
        assert!(!prefs.syllable_underline, "overwrite, not merge");
    }

    #[test]
    fn apply_leaves_phonemes_and_semantics_alone() {
        let mut prefs = Preferences::default();
        prefs.active_phonemes.insert("an".into(), "#E57373".into());
        prefs.semantic_concepts = true;
        ProfilePresets::apply_to("low-vision", &mut prefs).unwrap();
        assert_eq!(prefs.active_phonemes.len(), 1);
        assert!(prefs.semantic_concepts);
    }

    #[test]
    fn unknown_profile_is_an_error_and_a_no_op() {
        let mut prefs = Preferences::default();
        let before = prefs.clone();
        let err = ProfilePresets::apply_to("night-owl", &mut prefs).unwrap_err();
        assert!(matches!(err, ReaderError::UnknownProfile(ref id) if id == "night-owl"));
        assert_eq!(prefs, before);
    }
}
