// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word annotation: syllables, phoneme colouring, silent letters and
// semantic tags for a single whitespace-free token.
//
// Highlight steps run in a fixed order over a fragment. Each step only ever
// looks at bare `Text` nodes at the top level of the fragment, so text that
// an earlier step already wrapped can never be matched again.

use std::sync::LazyLock;

use readzen_core::{PhonemeCatalog, Preferences};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::syllables::split_syllables;
use crate::tree::{AnnotatedNode, Element, Fragment, Tag, fragment_text};

// Class names are part of the output contract; stylesheets select on them.
pub const CLASS_SYLLABLE: &str = "syll";
pub const CLASS_SYLLABLE_UNDERLINED: &str = "syll-underlined";
pub const CLASS_PHONEME: &str = "phoneme-highlight";
pub const CLASS_SILENT_LETTER: &str = "silent-letter";
pub const CLASS_SEMANTIC_PROPER: &str = "semantic-proper";
pub const CLASS_SEMANTIC_DATE: &str = "semantic-date";
pub const CLASS_SEMANTIC_CONCEPT: &str = "semantic-concept";

/// `syll-alt-1` .. `syll-alt-3` for syllable index `i`.
pub fn alternation_class(index: usize) -> String {
    format!("syll-alt-{}", index % 3 + 1)
}

const SILENT_LETTERS: [char; 6] = ['e', 's', 't', 'd', 'x', 'z'];

/// Spans longer than this many characters are tagged as concepts.
const CONCEPT_MAX_PLAIN_CHARS: usize = 8;

// No sentence-position awareness: a capitalised sentence opener is tagged too.
static PROPER_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Lu}\p{Ll}").expect("BUG: hardcoded proper-noun regex is statically valid")
});

struct PhonemeMatcher {
    grapheme: String,
    pattern: Regex,
    color: String,
}

/// Annotates words according to one preference snapshot.
///
/// Construction compiles the active phoneme patterns once; `annotate` is then
/// a pure function of the word.
pub struct WordAnnotator<'p> {
    prefs: &'p Preferences,
    phonemes: Vec<PhonemeMatcher>,
}

impl<'p> WordAnnotator<'p> {
    pub fn new(prefs: &'p Preferences) -> Self {
        Self::with_catalog(prefs, &PhonemeCatalog::standard())
    }

    /// Use `catalog` to decide which phoneme wins when two overlap.
    pub fn with_catalog(prefs: &'p Preferences, catalog: &PhonemeCatalog) -> Self {
        let phonemes = if prefs.phonemes_enabled {
            catalog
                .precedence(&prefs.active_phonemes)
                .into_iter()
                .filter_map(|(grapheme, color)| {
                    match RegexBuilder::new(&regex::escape(grapheme))
                        .case_insensitive(true)
                        .build()
                    {
                        Ok(pattern) => Some(PhonemeMatcher {
                            grapheme: grapheme.to_string(),
                            pattern,
                            color: color.to_string(),
                        }),
                        Err(e) => {
                            debug!(grapheme, error = %e, "skipping phoneme pattern");
                            None
                        }
                    }
                })
                .collect()
        } else {
            Vec::new()
        };
        Self { prefs, phonemes }
    }

    /// Annotate one token. Whitespace never reaches this point.
    pub fn annotate(&self, word: &str) -> Fragment {
        if word.is_empty() {
            return Vec::new();
        }
        if !self.prefs.syllabic {
            return self.highlight(word);
        }
        split_syllables(word)
            .into_iter()
            .enumerate()
            .map(|(index, syllable)| self.syllable(index, syllable))
            .collect()
    }

    fn syllable(&self, index: usize, text: &str) -> AnnotatedNode {
        let mut el = Element::new(Tag::Span).with_class(CLASS_SYLLABLE);
        if self.prefs.syllable_alternation {
            el = el.with_class(alternation_class(index));
        }
        if self.prefs.syllable_underline {
            el = el.with_class(CLASS_SYLLABLE_UNDERLINED);
        }
        AnnotatedNode::Element(el.with_children(self.highlight(text)))
    }

    /// The internal highlight step for a word or a syllable.
    ///
    /// Order: phonemes, silent letter, then semantic wraps from the innermost
    /// (proper noun) to the outermost (concept).
    pub fn highlight(&self, span: &str) -> Fragment {
        let mut nodes = vec![AnnotatedNode::text(span)];

        for matcher in &self.phonemes {
            nodes = mark_phoneme(nodes, matcher);
        }

        if self.prefs.silent_letters {
            mark_silent_letter(&mut nodes);
        }

        if self.prefs.any_semantic() {
            let plain = fragment_text(&nodes);
            if self.prefs.semantic_proper_nouns && PROPER_NOUN.is_match(&plain) {
                nodes = wrap(CLASS_SEMANTIC_PROPER, nodes);
            }
            if self.prefs.semantic_dates && plain.chars().any(|c| c.is_ascii_digit()) {
                nodes = wrap(CLASS_SEMANTIC_DATE, nodes);
            }
            if self.prefs.semantic_concepts && plain.chars().count() > CONCEPT_MAX_PLAIN_CHARS {
                nodes = wrap(CLASS_SEMANTIC_CONCEPT, nodes);
            }
        }

        nodes
    }
}

/// Annotate `word` with a one-off annotator.
pub fn annotate(word: &str, prefs: &Preferences) -> Fragment {
    WordAnnotator::new(prefs).annotate(word)
}

fn wrap(class: &str, children: Fragment) -> Fragment {
    vec![AnnotatedNode::Element(
        Element::new(Tag::Span).with_class(class).with_children(children),
    )]
}

fn mark_phoneme(nodes: Fragment, matcher: &PhonemeMatcher) -> Fragment {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let text = match node {
            AnnotatedNode::Text(text) => text,
            other => {
                out.push(other);
                continue;
            }
        };
        let mut last = 0;
        for found in matcher.pattern.find_iter(&text) {
            if found.start() > last {
                out.push(AnnotatedNode::text(&text[last..found.start()]));
            }
            out.push(AnnotatedNode::Element(
                Element::new(Tag::Span)
                    .with_class(CLASS_PHONEME)
                    .with_attribute("style", format!("color: {}", matcher.color))
                    .with_attribute("data-phoneme", matcher.grapheme.as_str())
                    .with_children(vec![AnnotatedNode::text(found.as_str())]),
            ));
            last = found.end();
        }
        if last == 0 {
            out.push(AnnotatedNode::Text(text));
        } else if last < text.len() {
            out.push(AnnotatedNode::text(&text[last..]));
        }
    }
    out
}

fn mark_silent_letter(nodes: &mut Fragment) {
    let Some(AnnotatedNode::Text(tail)) = nodes.last_mut() else {
        return;
    };
    let Some(last) = tail.chars().next_back() else {
        return;
    };
    if !SILENT_LETTERS.contains(&last.to_ascii_lowercase()) {
        return;
    }
    let letter = tail.split_off(tail.len() - last.len_utf8());
    if tail.is_empty() {
        nodes.pop();
    }
    nodes.extend(wrap(CLASS_SILENT_LETTER, vec![AnnotatedNode::Text(letter)]));
}
