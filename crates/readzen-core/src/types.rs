// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the ReadZen reader.

use serde::{Deserialize, Serialize};

/// Colour theme applied by the external styling layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    /// Keyword used in the persisted blob and as a CSS hook.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Sepia => "sepia",
        }
    }
}

/// Reading font family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Default,
    /// OpenDyslexic-style weighted glyphs.
    Dyslexic,
    Lexend,
}

impl Font {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dyslexic => "dyslexic",
            Self::Lexend => "lexend",
        }
    }
}

/// Boolean reading aids that can be toggled individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingAid {
    Syllabic,
    SyllableAlternation,
    SyllableUnderline,
    Phonemes,
    SilentLetters,
    SemanticProperNouns,
    SemanticDates,
    SemanticConcepts,
}

impl ReadingAid {
    /// Every toggle, in the order the settings panel lists them.
    pub const ALL: [ReadingAid; 8] = [
        Self::Syllabic,
        Self::SyllableAlternation,
        Self::SyllableUnderline,
        Self::Phonemes,
        Self::SilentLetters,
        Self::SemanticProperNouns,
        Self::SemanticDates,
        Self::SemanticConcepts,
    ];
}
