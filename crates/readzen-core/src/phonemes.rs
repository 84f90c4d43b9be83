// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Phoneme catalog: the canonical graphemes offered in the settings panel,
// each paired with a default highlight colour.

use std::collections::BTreeMap;

use crate::error::{ReaderError, Result};

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonemeEntry {
    pub grapheme: &'static str,
    pub color: &'static str,
}

const STANDARD: &[PhonemeEntry] = &[
    PhonemeEntry { grapheme: "ou", color: "#E57373" },
    PhonemeEntry { grapheme: "on", color: "#64B5F6" },
    PhonemeEntry { grapheme: "an", color: "#81C784" },
    PhonemeEntry { grapheme: "en", color: "#4DB6AC" },
    PhonemeEntry { grapheme: "in", color: "#FFB74D" },
    PhonemeEntry { grapheme: "ai", color: "#BA68C8" },
    PhonemeEntry { grapheme: "ei", color: "#9575CD" },
    PhonemeEntry { grapheme: "au", color: "#F06292" },
    PhonemeEntry { grapheme: "eau", color: "#A1887F" },
    PhonemeEntry { grapheme: "oi", color: "#4FC3F7" },
    PhonemeEntry { grapheme: "ch", color: "#AED581" },
    PhonemeEntry { grapheme: "gn", color: "#FF8A65" },
    PhonemeEntry { grapheme: "ph", color: "#7986CB" },
    PhonemeEntry { grapheme: "qu", color: "#DCE775" },
    PhonemeEntry { grapheme: "eu", color: "#90A4AE" },
    PhonemeEntry { grapheme: "un", color: "#FFD54F" },
];

/// Ordered grapheme catalog.
///
/// Only seeds UI state; the annotator reads `activePhonemes` directly and
/// uses [`PhonemeCatalog::rank`] to break overlaps.
#[derive(Debug, Clone, Copy)]
pub struct PhonemeCatalog {
    entries: &'static [PhonemeEntry],
}

impl PhonemeCatalog {
    pub fn standard() -> Self {
        Self { entries: STANDARD }
    }

    pub fn entries(&self) -> &'static [PhonemeEntry] {
        self.entries
    }

    /// Position of a grapheme in the catalog (case-insensitive).
    pub fn rank(&self, grapheme: &str) -> Option<usize> {
        let lowered = grapheme.to_lowercase();
        self.entries.iter().position(|e| e.grapheme == lowered)
    }

    pub fn default_color(&self, grapheme: &str) -> Option<&'static str> {
        self.rank(grapheme).map(|i| self.entries[i].color)
    }

    /// An `activePhonemes` map with every catalog entry in its default colour.
    pub fn seed_all(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.grapheme.to_string(), e.color.to_string()))
            .collect()
    }

    /// Sort active graphemes into application order: catalog order first,
    /// then anything outside the catalog lexically.
    pub fn precedence<'a>(&self, active: &'a BTreeMap<String, String>) -> Vec<(&'a str, &'a str)> {
        let mut ordered: Vec<(&str, &str)> = active
            .iter()
            .filter(|(g, _)| !g.is_empty())
            .map(|(g, c)| (g.as_str(), c.as_str()))
            .collect();
        ordered.sort_by_key(|(g, _)| (self.rank(g).unwrap_or(usize::MAX), g.to_lowercase()));
        ordered
    }
}

impl Default for PhonemeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validate a grapheme/colour pair before it enters `activePhonemes`.
///
/// Graphemes must be non-empty letters; colours must be `#RGB` or `#RRGGBB`.
pub fn validate_entry(grapheme: &str, color: &str) -> Result<()> {
    if grapheme.is_empty() || !grapheme.chars().all(char::is_alphabetic) {
        return Err(ReaderError::InvalidPhoneme(format!(
            "grapheme must be non-empty letters, got {grapheme:?}"
        )));
    }
    let hex = color.strip_prefix('#').unwrap_or("");
    let valid_len = hex.len() == 3 || hex.len() == 6;
    if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ReaderError::InvalidPhoneme(format!(
            "colour for {grapheme:?} must be #RGB or #RRGGBB, got {color:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_graphemes_are_unique() {
        let catalog = PhonemeCatalog::standard();
        let seeded = catalog.seed_all();
        assert_eq!(seeded.len(), catalog.entries().len());
    }

    #[test]
    fn precedence_follows_catalog_then_lexical() {
        let catalog = PhonemeCatalog::standard();
        let mut active = BTreeMap::new();
        active.insert("zz".to_string(), "#000".to_string());
        active.insert("an".to_string(), "#111".to_string());
        active.insert("ou".to_string(), "#222".to_string());
        active.insert("aa".to_string(), "#333".to_string());

        let order: Vec<&str> = catalog.precedence(&active).into_iter().map(|(g, _)| g).collect();
        assert_eq!(order, vec!["ou", "an", "aa", "zz"]);
    }

    #[test]
    fn rank_is_case_insensitive() {
        assert_eq!(PhonemeCatalog::standard().rank("OU"), Some(0));
        assert_eq!(PhonemeCatalog::standard().default_color("An"), Some("#81C784"));
    }

    #[test]
    fn colour_validation() {
        assert!(validate_entry("an", "#E57373").is_ok());
        assert!(validate_entry("an", "#fff").is_ok());
        assert!(validate_entry("an", "red").is_err());
        assert!(validate_entry("an", "#12345").is_err());
        assert!(validate_entry("", "#fff").is_err());
        assert!(validate_entry("a<", "#fff").is_err());
    }
}
