// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ReaderSession: the single owner of preferences, the raw text cache and
// the mounted tree.
//
// Every change that affects annotation persists first and then re-renders
// from the cached raw text. The mounted tree is never edited in place except
// by the reconciliation pass that runs as part of each render.

use readzen_core::error::Result;
use readzen_core::{Font, Preferences, ProfilePresets, ReadingAid, Theme};
use readzen_render::{AnnotatedTree, ImageTableReconciler, ReconcileReport, TextRenderer, to_html};
use tracing::{debug, info, warn};

use crate::store::PreferenceStore;

/// One reader page: preferences, the text it shows and the rendered result.
///
/// Mutation takes `&mut self`. A host that shares a session between threads
/// wraps it in a single `Mutex`.
#[derive(Debug)]
pub struct ReaderSession {
    store: PreferenceStore,
    raw_text: Option<String>,
    mounted: AnnotatedTree,
    last_report: ReconcileReport,
}

impl ReaderSession {
    pub fn new(store: PreferenceStore) -> Self {
        Self {
            store,
            raw_text: None,
            mounted: AnnotatedTree::default(),
            last_report: ReconcileReport::default(),
        }
    }

    /// A session whose preferences never leave memory.
    pub fn in_memory() -> Self {
        Self::new(PreferenceStore::in_memory())
    }

    // -- Text ----------------------------------------------------------------

    /// Replace the cached text and mount a fresh render of it.
    pub fn load_text(&mut self, raw: impl Into<String>) -> &AnnotatedTree {
        let raw = raw.into();
        info!(chars = raw.chars().count(), "loading text");
        self.raw_text = Some(raw);
        self.rerender();
        &self.mounted
    }

    /// Drop the cached text and unmount.
    pub fn clear_text(&mut self) {
        self.raw_text = None;
        self.mounted = AnnotatedTree::default();
        self.last_report = ReconcileReport::default();
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn mounted(&self) -> &AnnotatedTree {
        &self.mounted
    }

    pub fn to_html(&self) -> String {
        to_html(&self.mounted)
    }

    /// Counts from the reconciliation pass of the latest render.
    pub fn last_report(&self) -> ReconcileReport {
        self.last_report
    }

    // -- Preferences ---------------------------------------------------------

    pub fn preferences(&self) -> &Preferences {
        self.store.preferences()
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Mutate the preferences, persist them, then re-render.
    pub fn set_preferences(&mut self, f: impl FnOnce(&mut Preferences)) {
        self.store.update(f);
        self.rerender();
    }

    pub fn set_aid(&mut self, aid: ReadingAid, enabled: bool) {
        self.set_preferences(|p| p.set_aid(aid, enabled));
    }

    /// Flip one reading aid. Returns its new state.
    pub fn toggle(&mut self, aid: ReadingAid) -> bool {
        let enabled = !self.preferences().aid(aid);
        self.set_aid(aid, enabled);
        enabled
    }

    /// Theme only affects host styling, so the mounted tree is kept.
    pub fn set_theme(&mut self, theme: Theme) {
        self.store.update(|p| p.theme = theme);
    }

    /// Font only affects host styling, so the mounted tree is kept.
    pub fn set_font(&mut self, font: Font) {
        self.store.update(|p| p.font = font);
    }

    pub fn set_active_phoneme(&mut self, grapheme: &str, color: &str) -> Result<()> {
        self.store.set_active_phoneme(grapheme, color)?;
        self.rerender();
        Ok(())
    }

    pub fn remove_active_phoneme(&mut self, grapheme: &str) -> bool {
        let removed = self.store.remove_active_phoneme(grapheme);
        if removed {
            self.rerender();
        }
        removed
    }

    pub fn reset_to_defaults(&mut self) {
        self.store.reset_to_defaults();
        self.rerender();
    }

    /// Apply a named profile. Unknown ids are logged and change nothing.
    pub fn apply_profile(&mut self, id: &str) -> bool {
        let mut prefs = self.store.preferences().clone();
        match ProfilePresets::apply_to(id, &mut prefs) {
            Ok(profile) => {
                info!(profile = profile.id, "applying reading profile");
                self.store.persist(prefs);
                self.rerender();
                true
            }
            Err(e) => {
                warn!(error = %e, "ignoring profile request");
                false
            }
        }
    }

    // -- Rendering -----------------------------------------------------------

    /// Full render of the cached text with the current preferences.
    fn rerender(&mut self) {
        let Some(raw) = self.raw_text.as_deref() else {
            debug!("nothing mounted, skipping render");
            return;
        };
        let mut tree = TextRenderer::render(raw, self.store.preferences());
        self.last_report = ImageTableReconciler::reconcile(&mut tree);
        self.mounted = tree;
        debug!(blocks = self.mounted.nodes.len(), "mounted fresh render");
    }
}

impl Default for ReaderSession {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readzen_render::render_page;

    #[test]
    fn preferences_change_without_text_is_quiet() {
        let mut session = ReaderSession::in_memory();
        session.toggle(ReadingAid::Syllabic);
        assert!(session.mounted().is_empty());
        assert!(session.preferences().syllabic);
    }

    #[test]
    fn toggle_matches_cold_render() {
        let mut session = ReaderSession::in_memory();
        session.load_text("Le chocolat de maman.");
        assert!(session.toggle(ReadingAid::Syllabic));
        let cold = render_page("Le chocolat de maman.", session.preferences());
        assert_eq!(session.mounted(), &cold);

        assert!(!session.toggle(ReadingAid::Syllabic));
        assert_eq!(session.to_html(), "<p>Le chocolat de maman.</p>");
    }

    #[test]
    fn whitespace_text_mounts_empty_tree() {
        let mut session = ReaderSession::in_memory();
        assert!(session.load_text("  \n\n\t ").is_empty());
        assert_eq!(session.to_html(), "");
    }

    #[test]
    fn theme_leaves_tree_alone() {
        let mut session = ReaderSession::in_memory();
        session.load_text("Bonjour");
        let before = session.mounted().clone();
        session.set_theme(Theme::Dark);
        session.set_font(Font::Dyslexic);
        assert_eq!(session.mounted(), &before);
        assert_eq!(session.preferences().theme, Theme::Dark);
        assert_eq!(session.preferences().font, Font::Dyslexic);
    }

    #[test]
    fn clear_text_unmounts() {
        let mut session = ReaderSession::in_memory();
        session.load_text("Bonjour");
        session.clear_text();
        assert!(session.raw_text().is_none());
        assert!(session.mounted().is_empty());
    }
}
