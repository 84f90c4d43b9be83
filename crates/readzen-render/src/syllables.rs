// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vowel-run syllable segmentation.
//
// A syllable is the consonant run before a vowel run plus the vowel run.
// The consonants after it close the syllable when they run to the end of the
// word. Otherwise a lone consonant opens the next syllable, and a cluster
// gives its first consonant to the current syllable and the rest to the next
// one. This is a visual reading aid, not linguistic hyphenation.

/// Vowels, including the accented forms common in French text.
const VOWELS: &str = "aeiouyàâäéèêëîïôöùûüÿœæ";

pub fn is_vowel(c: char) -> bool {
    let lower = c.to_lowercase().next().unwrap_or(c);
    VOWELS.contains(lower)
}

/// Split `word` into syllables. Concatenating the result always yields
/// `word` again; a word without vowels comes back as a single piece.
pub fn split_syllables(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let n = chars.len();
    let byte_at = |i: usize| if i < n { chars[i].0 } else { word.len() };

    let mut pieces = Vec::new();
    let mut i = 0;
    while i < n {
        let start = i;
        let mut j = i;
        while j < n && !is_vowel(chars[j].1) {
            j += 1;
        }
        if j == n {
            break;
        }
        while j < n && is_vowel(chars[j].1) {
            j += 1;
        }

        let mut k = j;
        while k < n && !is_vowel(chars[k].1) {
            k += 1;
        }
        if k == n {
            j = n;
        } else if k - j >= 2 {
            j += 1;
        }

        pieces.push(&word[byte_at(start)..byte_at(j)]);
        i = j;
    }

    if pieces.is_empty() {
        return vec![word];
    }
    // Trailing consonants are always absorbed above; this keeps the
    // concatenation guarantee if that ever changes.
    if i < n {
        pieces.push(&word[byte_at(i)..]);
    }
    pieces
}
