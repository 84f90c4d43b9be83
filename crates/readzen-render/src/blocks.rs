// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block segmentation of extracted text.
//
// Blocks are separated by blank lines. A block is a heading (`# `, `## `,
// `### `), a pipe table, a run of `![alt](src)` image lines, or a paragraph.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t\r]*\n").expect("BUG: hardcoded blank-line regex is statically valid")
});

// Bounded quantifiers keep pathological extractor output cheap.
static IMAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!\[([^\]]{0,200})\]\(([^)\s]{1,2000})\)$")
        .expect("BUG: hardcoded image-line regex is statically valid")
});

/// One row of a pipe table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    /// Rows above the `|---|` separator are header rows.
    pub header: bool,
    pub cells: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef<'a> {
    pub alt: &'a str,
    pub src: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Paragraph(&'a str),
    Table(Vec<TableRow<'a>>),
    Images(Vec<ImageRef<'a>>),
}

/// Split raw text into ordered, non-empty blocks.
pub fn split_blocks(raw: &str) -> Vec<Block<'_>> {
    BLANK_LINE
        .split(raw)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(classify)
        .collect()
}

fn classify(block: &str) -> Block<'_> {
    for (marker, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(text) = block.strip_prefix(marker) {
            return Block::Heading {
                level,
                text: text.trim(),
            };
        }
    }
    if let Some(rows) = parse_table(block) {
        return Block::Table(rows);
    }
    if let Some(images) = parse_images(block) {
        return Block::Images(images);
    }
    Block::Paragraph(block)
}

fn parse_table(block: &str) -> Option<Vec<TableRow<'_>>> {
    let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() || !lines.iter().all(|l| l.starts_with('|')) {
        return None;
    }

    let separator = lines.iter().position(|l| is_separator(l));
    let rows = lines
        .iter()
        .enumerate()
        .filter(|(i, l)| Some(*i) != separator && !is_separator(l))
        .map(|(i, l)| TableRow {
            header: separator.is_some_and(|s| i < s),
            cells: split_cells(l),
        })
        .collect();
    Some(rows)
}

fn is_separator(line: &str) -> bool {
    line.contains('-') && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn split_cells(line: &str) -> Vec<&str> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

fn parse_images(block: &str) -> Option<Vec<ImageRef<'_>>> {
    block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| {
            let caps = IMAGE_LINE.captures(line)?;
            Some(ImageRef {
                alt: caps.get(1).map_or("", |m| m.as_str()),
                src: caps.get(2)?.as_str(),
            })
        })
        .collect()
}
