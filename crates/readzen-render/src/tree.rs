// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotated markup tree: the renderer's output and the reconciler's input.
//
// The tree is built from typed nodes rather than spliced HTML strings, so
// annotation steps can only ever wrap text they can see, and escaping
// happens exactly once in `html::to_html`.

/// Element tags the renderer and reconciler produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    H1,
    H2,
    H3,
    P,
    Span,
    Div,
    Table,
    Thead,
    Tbody,
    Tr,
    Th,
    Td,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::P => "p",
            Self::Span => "span",
            Self::Div => "div",
            Self::Table => "table",
            Self::Thead => "thead",
            Self::Tbody => "tbody",
            Self::Tr => "tr",
            Self::Th => "th",
            Self::Td => "td",
        }
    }

    /// First- and second-level headings mark a section boundary.
    pub fn is_major_heading(&self) -> bool {
        matches!(self, Self::H1 | Self::H2)
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Self::H1 | Self::H2 | Self::H3)
    }

    /// Heading tag for a `#` count, clamped to the levels we emit.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::H1,
            2 => Self::H2,
            _ => Self::H3,
        }
    }
}

/// A tagged element with style classes and extra attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<AnnotatedNode>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<AnnotatedNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendants, markup stripped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

/// An image that came out of extraction, positioned by block index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNode {
    pub src: String,
    pub alt: String,
    /// Zero-based index of the source block the image was extracted from.
    pub original_position: usize,
}

/// One node of the annotated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatedNode {
    Text(String),
    Element(Element),
    Image(ImageNode),
}

impl AnnotatedNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Self::Image(_) => {}
        }
    }
}

/// Annotation output for one word or span.
pub type Fragment = Vec<AnnotatedNode>;

/// Concatenated text of a fragment, markup stripped.
pub fn fragment_text(fragment: &[AnnotatedNode]) -> String {
    let mut out = String::new();
    for node in fragment {
        node.collect_text(&mut out);
    }
    out
}

/// The rendered document: an ordered list of top-level blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedTree {
    pub nodes: Vec<AnnotatedNode>,
}

impl AnnotatedTree {
    pub fn new(nodes: Vec<AnnotatedNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn text_content(&self) -> String {
        fragment_text(&self.nodes)
    }

    /// Every image in document order, wherever it sits.
    pub fn images(&self) -> Vec<&ImageNode> {
        fn visit<'a>(nodes: &'a [AnnotatedNode], out: &mut Vec<&'a ImageNode>) {
            for node in nodes {
                match node {
                    AnnotatedNode::Image(img) => out.push(img),
                    AnnotatedNode::Element(el) => visit(&el.children, out),
                    AnnotatedNode::Text(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.nodes, &mut out);
        out
    }

    /// Count elements carrying `class` anywhere in the tree.
    pub fn count_class(&self, class: &str) -> usize {
        fn visit(nodes: &[AnnotatedNode], class: &str) -> usize {
            nodes
                .iter()
                .filter_map(AnnotatedNode::as_element)
                .map(|el| usize::from(el.has_class(class)) + visit(&el.children, class))
                .sum()
        }
        visit(&self.nodes, class)
    }
}
