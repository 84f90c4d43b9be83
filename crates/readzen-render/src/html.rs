// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTML serialization of the annotated tree. All escaping happens here.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::tree::{AnnotatedNode, AnnotatedTree, Element, ImageNode};

/// Serialize the tree. Top-level blocks are separated by newlines.
pub fn to_html(tree: &AnnotatedTree) -> String {
    let mut out = String::new();
    for (i, node) in tree.nodes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_node(&mut out, node);
    }
    out
}

/// Serialize a single node (and its subtree).
pub fn node_to_html(node: &AnnotatedNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &AnnotatedNode) {
    match node {
        AnnotatedNode::Text(text) => out.push_str(&encode_text(text)),
        AnnotatedNode::Element(el) => write_element(out, el),
        AnnotatedNode::Image(img) => write_image(out, img),
    }
}

fn write_element(out: &mut String, el: &Element) {
    let tag = el.tag.as_str();
    out.push('<');
    out.push_str(tag);
    if !el.classes.is_empty() {
        let classes = el.classes.join(" ");
        let _ = write!(out, " class=\"{}\"", encode_double_quoted_attribute(&classes));
    }
    for (name, value) in &el.attributes {
        let _ = write!(out, " {}=\"{}\"", name, encode_double_quoted_attribute(value));
    }
    out.push('>');
    for child in &el.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{tag}>");
}

fn write_image(out: &mut String, img: &ImageNode) {
    let _ = write!(
        out,
        "<img src=\"{}\" alt=\"{}\" data-original-position=\"{}\">",
        encode_double_quoted_attribute(&img.src),
        encode_double_quoted_attribute(&img.alt),
        img.original_position
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tag;

    #[test]
    fn text_is_escaped_once() {
        let tree = AnnotatedTree::new(vec![AnnotatedNode::Element(
            Element::new(Tag::P).with_children(vec![AnnotatedNode::text("<b>fish & chips</b>")]),
        )]);
        assert_eq!(to_html(&tree), "<p>&lt;b&gt;fish &amp; chips&lt;/b&gt;</p>");
    }

    #[test]
    fn classes_and_attributes() {
        let node = AnnotatedNode::Element(
            Element::new(Tag::Span)
                .with_class("phoneme-highlight")
                .with_attribute("style", "color: #E57373")
                .with_children(vec![AnnotatedNode::text("an")]),
        );
        assert_eq!(
            node_to_html(&node),
            "<span class=\"phoneme-highlight\" style=\"color: #E57373\">an</span>"
        );
    }

    #[test]
    fn image_attributes_are_escaped() {
        let node = AnnotatedNode::Image(ImageNode {
            src: "a\".png".into(),
            alt: "x".into(),
            original_position: 4,
        });
        assert_eq!(
            node_to_html(&node),
            "<img src=\"a&quot;.png\" alt=\"x\" data-original-position=\"4\">"
        );
    }

    #[test]
    fn blocks_on_separate_lines() {
        let tree = AnnotatedTree::new(vec![
            AnnotatedNode::Element(Element::new(Tag::H3).with_children(vec![AnnotatedNode::text("T")])),
            AnnotatedNode::Element(Element::new(Tag::P).with_children(vec![AnnotatedNode::text("p")])),
        ]);
        assert_eq!(to_html(&tree), "<h3>T</h3>\n<p>p</p>");
    }
}
