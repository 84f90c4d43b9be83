// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// readzen-render: Turns extracted document text into an annotated markup
// tree for the ReadZen reader.
//
// Provides block segmentation, per-word reading aids (syllables, phoneme
// colouring, silent letters, semantic tags), a post-render pass that moves
// stray images back into their tables, and HTML serialization.

pub mod annotator;
pub mod blocks;
pub mod html;
pub mod reconcile;
pub mod renderer;
pub mod syllables;
pub mod tree;

// Re-export the primary entry points so callers can use `readzen_render::TextRenderer` etc.
pub use annotator::{WordAnnotator, annotate};
pub use html::to_html;
pub use reconcile::{ImageTableReconciler, ReconcileReport};
pub use renderer::TextRenderer;
pub use syllables::split_syllables;
pub use tree::{AnnotatedNode, AnnotatedTree, Element, Fragment, ImageNode, Tag};

use readzen_core::Preferences;

/// Render and reconcile in one call. This is what a page mounts.
pub fn render_page(raw_text: &str, prefs: &Preferences) -> AnnotatedTree {
    let mut tree = TextRenderer::render(raw_text, prefs);
    ImageTableReconciler::reconcile(&mut tree);
    tree
}
