// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text renderer: raw extracted text in, annotated tree out.
//
// Rendering is always a cold pass over the raw text. There is no
// incremental path: an annotated tree is never fed back in, so a syllable
// boundary or silent-letter span can never be split or wrapped twice.

use std::sync::LazyLock;

use readzen_core::Preferences;
use regex::Regex;
use tracing::{debug, instrument};

use crate::annotator::WordAnnotator;
use crate::blocks::{Block, ImageRef, TableRow, split_blocks};
use crate::tree::{AnnotatedNode, AnnotatedTree, Element, Fragment, ImageNode, Tag};

pub const CLASS_TITLE: &str = "title";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+|\S+").expect("BUG: hardcoded token regex is statically valid")
});

/// A whitespace run or a run of anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub whitespace: bool,
}

/// Tokenize on whitespace runs, keeping the whitespace as its own tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = Token<'_>> {
    TOKEN.find_iter(text).map(|m| Token {
        text: m.as_str(),
        whitespace: m.as_str().starts_with(char::is_whitespace),
    })
}

/// Stateless renderer entry point.
pub struct TextRenderer;

impl TextRenderer {
    /// Render `raw_text` under `prefs`.
    ///
    /// Deterministic: equal inputs give structurally equal trees. Empty or
    /// whitespace-only input gives an empty tree. Images are placed where
    /// they were extracted; moving them into tables is the reconciler's job.
    #[instrument(skip_all, fields(raw_len = raw_text.len()))]
    pub fn render(raw_text: &str, prefs: &Preferences) -> AnnotatedTree {
        let annotator = WordAnnotator::new(prefs);
        let nodes: Vec<AnnotatedNode> = split_blocks(raw_text)
            .into_iter()
            .enumerate()
            .map(|(position, block)| render_block(&annotator, position, block))
            .collect();
        debug!(blocks = nodes.len(), "text rendered");
        AnnotatedTree::new(nodes)
    }
}

/// Annotate a run of text token by token. Whitespace passes through as-is.
pub fn annotate_run(annotator: &WordAnnotator<'_>, text: &str) -> Fragment {
    let mut out = Vec::new();
    for token in tokenize(text) {
        if token.whitespace {
            out.push(AnnotatedNode::text(token.text));
        } else {
            out.extend(annotator.annotate(token.text));
        }
    }
    out
}

fn render_block(annotator: &WordAnnotator<'_>, position: usize, block: Block<'_>) -> AnnotatedNode {
    let el = match block {
        Block::Heading { level, text } => Element::new(Tag::heading(level))
            .with_class(CLASS_TITLE)
            .with_children(annotate_run(annotator, text)),
        Block::Paragraph(text) => Element::new(Tag::P).with_children(annotate_run(annotator, text)),
        Block::Table(rows) => render_table(annotator, &rows),
        Block::Images(images) => Element::new(Tag::P).with_children(
            images
                .iter()
                .map(|img| image_node(img, position))
                .collect(),
        ),
    };
    AnnotatedNode::Element(el)
}

fn image_node(img: &ImageRef<'_>, position: usize) -> AnnotatedNode {
    AnnotatedNode::Image(ImageNode {
        src: img.src.to_string(),
        alt: img.alt.to_string(),
        original_position: position,
    })
}

fn render_table(annotator: &WordAnnotator<'_>, rows: &[TableRow<'_>]) -> Element {
    let row_node = |row: &TableRow<'_>| {
        let cell_tag = if row.header { Tag::Th } else { Tag::Td };
        let cells = row
            .cells
            .iter()
            .map(|cell| {
                AnnotatedNode::Element(
                    Element::new(cell_tag).with_children(annotate_run(annotator, cell)),
                )
            })
            .collect();
        AnnotatedNode::Element(Element::new(Tag::Tr).with_children(cells))
    };

    let head: Vec<AnnotatedNode> = rows.iter().filter(|r| r.header).map(row_node).collect();
    let body: Vec<AnnotatedNode> = rows.iter().filter(|r| !r.header).map(row_node).collect();

    let mut sections = Vec::with_capacity(2);
    if !head.is_empty() {
        sections.push(AnnotatedNode::Element(Element::new(Tag::Thead).with_children(head)));
    }
    sections.push(AnnotatedNode::Element(Element::new(Tag::Tbody).with_children(body)));
    Element::new(Tag::Table).with_children(sections)
}
