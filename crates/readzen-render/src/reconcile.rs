// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image/table reconciliation.
//
// Layout extraction often pulls a table's pictures out of their cells and
// drops them after the table. This pass walks the siblings that follow each
// table, collects the stray images, and moves them into the rows whose first
// data cell looks like an image reference. It is best effort: counts that do
// not line up leave images or rows unmatched, and no text is ever dropped.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::tree::{AnnotatedNode, AnnotatedTree, Element, ImageNode, Tag};

/// Siblings examined after a table before giving up.
pub const MAX_SIBLINGS_EXAMINED: usize = 100;

pub const CLASS_IMAGE_CELL: &str = "image-cell";

static ID_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9#\-./\s]{2,25}$").expect("BUG: hardcoded id-like regex is statically valid")
});

static IMAGE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fig|image|photo|view|ref|#").expect("BUG: hardcoded keyword regex is statically valid")
});

const SHORT_TEXT_CHARS: RangeInclusive<usize> = 2..=49;

/// Whether a first data cell reads like a label for an image.
///
/// Any one of the three heuristics is enough: an ID-like code, an image
/// keyword, or simply short text.
pub fn is_reference_cell(text: &str) -> bool {
    let text = text.trim();
    ID_LIKE.is_match(text)
        || IMAGE_KEYWORD.is_match(text)
        || SHORT_TEXT_CHARS.contains(&text.chars().count())
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub tables: usize,
    pub images_collected: usize,
    pub images_placed: usize,
}

/// Where a collected image currently lives, relative to the table's siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Sibling(usize),
    Nested { sibling: usize, child: usize },
}

impl Slot {
    fn sibling(&self) -> usize {
        match *self {
            Self::Sibling(i) | Self::Nested { sibling: i, .. } => i,
        }
    }
}

/// Path from a table element to a row's first data cell.
#[derive(Debug, Clone)]
struct CellPath {
    section: Option<usize>,
    row: usize,
    cell: usize,
}

pub struct ImageTableReconciler;

impl ImageTableReconciler {
    /// Move stray images into their tables, in place.
    #[instrument(skip_all, fields(blocks = tree.nodes.len()))]
    pub fn reconcile(tree: &mut AnnotatedTree) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        reconcile_siblings(&mut tree.nodes, &mut report);
        debug!(
            tables = report.tables,
            collected = report.images_collected,
            placed = report.images_placed,
            "image/table reconciliation done"
        );
        report
    }
}

fn reconcile_siblings(nodes: &mut Vec<AnnotatedNode>, report: &mut ReconcileReport) {
    let mut i = 0;
    while i < nodes.len() {
        let is_table = matches!(&nodes[i], AnnotatedNode::Element(el) if el.tag == Tag::Table);
        if is_table {
            report.tables += 1;
            place_images(nodes, i, report);
        } else if let AnnotatedNode::Element(el) = &mut nodes[i] {
            reconcile_siblings(&mut el.children, report);
        }
        i += 1;
    }
}

fn collect_slots(nodes: &[AnnotatedNode], table: usize) -> Vec<Slot> {
    let mut slots = Vec::new();
    for (idx, node) in nodes
        .iter()
        .enumerate()
        .skip(table + 1)
        .take(MAX_SIBLINGS_EXAMINED)
    {
        match node {
            AnnotatedNode::Image(_) => slots.push(Slot::Sibling(idx)),
            AnnotatedNode::Element(el) if el.tag == Tag::Table || el.tag.is_major_heading() => break,
            AnnotatedNode::Element(el) => slots.extend(
                el.children
                    .iter()
                    .enumerate()
                    .filter(|(_, child)| child.is_image())
                    .map(|(child, _)| Slot::Nested { sibling: idx, child }),
            ),
            AnnotatedNode::Text(_) => {}
        }
    }
    slots
}

fn reference_cells(table: &Element) -> Vec<CellPath> {
    let mut out = Vec::new();
    let mut check_row = |section: Option<usize>, row: usize, tr: &Element| {
        let Some(cell) = tr
            .children
            .iter()
            .position(|c| matches!(c, AnnotatedNode::Element(el) if el.tag == Tag::Td))
        else {
            return;
        };
        if is_reference_cell(&tr.children[cell].text_content()) {
            out.push(CellPath { section, row, cell });
        }
    };

    for (si, child) in table.children.iter().enumerate() {
        let Some(el) = child.as_element() else { continue };
        match el.tag {
            Tag::Tr => check_row(None, si, el),
            Tag::Thead | Tag::Tbody => {
                for (ri, row) in el.children.iter().enumerate() {
                    if let Some(tr) = row.as_element().filter(|r| r.tag == Tag::Tr) {
                        check_row(Some(si), ri, tr);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn image_at(nodes: &[AnnotatedNode], slot: Slot) -> Option<ImageNode> {
    let node = match slot {
        Slot::Sibling(i) => nodes.get(i)?,
        Slot::Nested { sibling, child } => nodes.get(sibling)?.as_element()?.children.get(child)?,
    };
    match node {
        AnnotatedNode::Image(img) => Some(img.clone()),
        _ => None,
    }
}

fn cell_mut<'a>(table: &'a mut Element, path: &CellPath) -> Option<&'a mut Element> {
    let row_parent = match path.section {
        Some(section) => table.children.get_mut(section)?.as_element_mut()?,
        None => table,
    };
    row_parent
        .children
        .get_mut(path.row)?
        .as_element_mut()?
        .children
        .get_mut(path.cell)?
        .as_element_mut()
}

fn place_images(nodes: &mut Vec<AnnotatedNode>, table: usize, report: &mut ReconcileReport) {
    let slots = collect_slots(nodes, table);
    report.images_collected += slots.len();
    if slots.is_empty() {
        return;
    }

    let targets = match nodes[table].as_element() {
        Some(el) => reference_cells(el),
        None => return,
    };

    let moves: Vec<(CellPath, Slot, ImageNode)> = targets
        .into_iter()
        .zip(slots)
        .filter_map(|(path, slot)| image_at(nodes, slot).map(|img| (path, slot, img)))
        .collect();
    if moves.is_empty() {
        debug!(table, "no reference cells for trailing images");
        return;
    }

    // Take the images out, highest position first so indices stay valid.
    let mut taken: Vec<Slot> = moves.iter().map(|(_, slot, _)| *slot).collect();
    taken.sort_unstable_by(|a, b| b.cmp(a));

    let mut drop_siblings = BTreeSet::new();
    let mut touched = BTreeSet::new();
    for slot in &taken {
        match *slot {
            Slot::Sibling(i) => {
                drop_siblings.insert(i);
            }
            Slot::Nested { sibling, child } => {
                if let Some(el) = nodes[sibling].as_element_mut() {
                    el.children.remove(child);
                    touched.insert(sibling);
                }
            }
        }
    }
    for sibling in touched {
        if nodes[sibling].as_element().is_some_and(is_empty_container) {
            drop_siblings.insert(sibling);
        }
    }

    let mut placed = 0;
    if let Some(table_el) = nodes[table].as_element_mut() {
        for (path, slot, img) in moves {
            let Some(cell) = cell_mut(table_el, &path) else {
                debug!(sibling = slot.sibling(), "reference cell vanished, image left out");
                continue;
            };
            cell.children.push(AnnotatedNode::Element(
                Element::new(Tag::Div)
                    .with_class(CLASS_IMAGE_CELL)
                    .with_attribute("style", "text-align: center")
                    .with_children(vec![AnnotatedNode::Image(img)]),
            ));
            placed += 1;
        }
    }

    for sibling in drop_siblings.into_iter().rev() {
        nodes.remove(sibling);
    }

    report.images_placed += placed;
    debug!(table, placed, "images moved into table");
}

fn is_empty_container(el: &Element) -> bool {
    el.children.iter().all(|child| match child {
        AnnotatedNode::Text(t) => t.trim().is_empty(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_cell(tag: Tag, text: &str) -> AnnotatedNode {
        AnnotatedNode::Element(Element::new(tag).with_children(vec![AnnotatedNode::text(text)]))
    }

    fn row(cells: &[&str]) -> AnnotatedNode {
        AnnotatedNode::Element(
            Element::new(Tag::Tr).with_children(cells.iter().map(|c| text_cell(Tag::Td, c)).collect()),
        )
    }

    fn header_row(cells: &[&str]) -> AnnotatedNode {
        AnnotatedNode::Element(
            Element::new(Tag::Tr).with_children(cells.iter().map(|c| text_cell(Tag::Th, c)).collect()),
        )
    }

    fn table(rows: Vec<AnnotatedNode>) -> AnnotatedNode {
        AnnotatedNode::Element(Element::new(Tag::Table).with_children(rows))
    }

    fn image(src: &str) -> AnnotatedNode {
        AnnotatedNode::Image(ImageNode {
            src: src.into(),
            alt: String::new(),
            original_position: 0,
        })
    }

    fn image_para(src: &str) -> AnnotatedNode {
        AnnotatedNode::Element(Element::new(Tag::P).with_children(vec![image(src)]))
    }

    fn first_cell_images(table: &AnnotatedNode) -> Vec<Vec<String>> {
        table
            .as_element()
            .unwrap()
            .children
            .iter()
            .filter_map(AnnotatedNode::as_element)
            .filter(|r| r.tag == Tag::Tr)
            .map(|r| {
                let tree = AnnotatedTree::new(r.children.clone());
                tree.images().iter().map(|i| i.src.clone()).collect()
            })
            .collect()
    }

    #[test]
    fn reference_cell_heuristics() {
        assert!(is_reference_cell("REF-01"));
        assert!(is_reference_cell("  A12 / 3  "));
        assert!(is_reference_cell("See figure three for the full north-facing elevation drawing"));
        assert!(is_reference_cell("a short caption, really"));
        assert!(!is_reference_cell("x"));
        assert!(!is_reference_cell(""));
        assert!(!is_reference_cell(
            "A long description that is plainly prose and should stay exactly as written"
        ));
    }

    #[test]
    fn direct_sibling_images_fill_reference_rows() {
        let mut tree = AnnotatedTree::new(vec![
            table(vec![header_row(&["Ref", "Notes"]), row(&["REF-01", "a"]), row(&["REF-02", "b"])]),
            image("one.png"),
            image("two.png"),
        ]);
        let report = ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(report.images_placed, 2);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(
            first_cell_images(&tree.nodes[0]),
            vec![vec![], vec!["one.png".to_string()], vec!["two.png".to_string()]]
        );
    }

    #[test]
    fn emptied_paragraph_is_removed_but_text_survives() {
        let mixed = AnnotatedNode::Element(
            Element::new(Tag::P).with_children(vec![AnnotatedNode::text("Caption"), image("b.png")]),
        );
        let mut tree = AnnotatedTree::new(vec![
            table(vec![row(&["REF-01"]), row(&["REF-02"])]),
            image_para("a.png"),
            mixed,
        ]);
        ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.nodes[1].text_content(), "Caption");
        assert_eq!(tree.images().len(), 2);
    }

    #[test]
    fn major_heading_stops_the_walk() {
        let heading = AnnotatedNode::Element(
            Element::new(Tag::H2).with_children(vec![AnnotatedNode::text("Next section")]),
        );
        let mut tree = AnnotatedTree::new(vec![
            table(vec![row(&["REF-01"])]),
            heading,
            image_para("later.png"),
        ]);
        let report = ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(report.images_collected, 0);
        assert_eq!(tree.nodes.len(), 3);
    }

    #[test]
    fn minor_heading_does_not_stop_the_walk() {
        let heading = AnnotatedNode::Element(Element::new(Tag::H3).with_children(vec![AnnotatedNode::text("Aside")]));
        let mut tree = AnnotatedTree::new(vec![table(vec![row(&["REF-01"])]), heading, image_para("a.png")]);
        assert_eq!(ImageTableReconciler::reconcile(&mut tree).images_placed, 1);
    }

    #[test]
    fn next_table_claims_its_own_images() {
        let mut tree = AnnotatedTree::new(vec![
            table(vec![row(&["REF-01"])]),
            table(vec![row(&["REF-09"])]),
            image("b.png"),
        ]);
        ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(first_cell_images(&tree.nodes[0]), vec![Vec::<String>::new()]);
        assert_eq!(first_cell_images(&tree.nodes[1]), vec![vec!["b.png".to_string()]]);
    }

    #[test]
    fn more_images_than_rows_leaves_the_rest() {
        let mut tree = AnnotatedTree::new(vec![
            table(vec![row(&["REF-01"])]),
            image_para("a.png"),
            image_para("b.png"),
        ]);
        let report = ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(report.images_collected, 2);
        assert_eq!(report.images_placed, 1);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.images().len(), 2);
    }

    #[test]
    fn walk_is_bounded() {
        let mut nodes = vec![table(vec![row(&["REF-01"])])];
        for _ in 0..MAX_SIBLINGS_EXAMINED {
            nodes.push(AnnotatedNode::Element(
                Element::new(Tag::P).with_children(vec![AnnotatedNode::text("filler")]),
            ));
        }
        nodes.push(image_para("far.png"));
        let mut tree = AnnotatedTree::new(nodes);
        assert_eq!(ImageTableReconciler::reconcile(&mut tree).images_collected, 0);
    }

    #[test]
    fn walk_reaches_last_examined_sibling() {
        let mut nodes = vec![table(vec![row(&["REF-01"])])];
        for _ in 1..MAX_SIBLINGS_EXAMINED {
            nodes.push(AnnotatedNode::Element(
                Element::new(Tag::P).with_children(vec![AnnotatedNode::text("filler")]),
            ));
        }
        nodes.push(image_para("edge.png"));
        let mut tree = AnnotatedTree::new(nodes);
        let report = ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(report.images_collected, 1);
        assert_eq!(report.images_placed, 1);
    }

    #[test]
    fn no_table_no_change() {
        let mut tree = AnnotatedTree::new(vec![image_para("a.png")]);
        let before = tree.clone();
        ImageTableReconciler::reconcile(&mut tree);
        assert_eq!(tree, before);
    }
}
