// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PreferenceStore: owns the live Preferences and keeps the stored blob in
// step with them.
//
// Storage is never fatal. A blob that cannot be read or parsed yields
// defaults, and the first failed write switches the store to memory-only for
// the rest of the session.

use readzen_core::config::{Preferences, merge_stored_str};
use readzen_core::error::Result;
use readzen_core::phonemes::validate_entry;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::backend::{FileBackend, MemoryBackend, PreferenceBackend};

pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    preferences: Preferences,
    /// Keys written by someone else, carried through every persist.
    unknown: Map<String, Value>,
    degraded: bool,
}

impl PreferenceStore {
    /// Wrap `backend` and load whatever it holds.
    pub fn new(backend: impl PreferenceBackend + 'static) -> Self {
        let mut store = Self {
            backend: Box::new(backend),
            preferences: Preferences::default(),
            unknown: Map::new(),
            degraded: false,
        };
        store.load();
        store
    }

    /// A store that never leaves memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// A store backed by `preferences.json` in the per-user data directory.
    pub fn open_default() -> Self {
        let backend = FileBackend::default_location();
        info!(path = %backend.path().display(), "opening preference store");
        Self::new(backend)
    }

    /// Re-read the backend and merge the stored blob over the defaults.
    ///
    /// Missing, unreadable or malformed blobs give pure defaults. A degraded
    /// store keeps its in-memory state instead.
    pub fn load(&mut self) -> Preferences {
        if self.degraded {
            debug!("preference store is memory-only, skipping load");
            return self.preferences.clone();
        }
        let merged = match self.backend.read() {
            Ok(Some(blob)) => merge_stored_str(&blob),
            Ok(None) => Default::default(),
            Err(e) => {
                warn!(error = %e, "could not read stored preferences, continuing in memory");
                self.degraded = true;
                Default::default()
            }
        };
        if !merged.unknown.is_empty() {
            debug!(keys = merged.unknown.len(), "keeping unrecognised preference keys");
        }
        self.preferences = merged.preferences;
        self.unknown = merged.unknown;
        self.preferences.clone()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Whether a storage failure has switched the store to memory-only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Replace the live preferences and write them out.
    pub fn persist(&mut self, preferences: Preferences) {
        self.preferences = preferences;
        self.write_through();
    }

    /// Mutate the live preferences, then persist before returning.
    pub fn update(&mut self, f: impl FnOnce(&mut Preferences)) {
        f(&mut self.preferences);
        self.write_through();
    }

    /// Add or recolour a highlighted grapheme. Graphemes are stored lower-case.
    pub fn set_active_phoneme(&mut self, grapheme: &str, color: &str) -> Result<()> {
        validate_entry(grapheme, color)?;
        let key = grapheme.to_lowercase();
        let color = color.to_string();
        self.update(|p| {
            p.active_phonemes.insert(key, color);
        });
        Ok(())
    }

    /// Stop highlighting a grapheme. Returns whether it was active.
    pub fn remove_active_phoneme(&mut self, grapheme: &str) -> bool {
        let key = grapheme.to_lowercase();
        if !self.preferences.active_phonemes.contains_key(&key) {
            return false;
        }
        self.update(|p| {
            p.active_phonemes.remove(&key);
        });
        true
    }

    /// Back to the defaults. Keys owned by other writers are kept.
    pub fn reset_to_defaults(&mut self) {
        self.persist(Preferences::default());
    }

    fn write_through(&mut self) {
        if self.degraded {
            return;
        }
        let blob = match self.encode() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "could not encode preferences, continuing in memory");
                self.degraded = true;
                return;
            }
        };
        if let Err(e) = self.backend.write(&blob) {
            warn!(error = %e, "could not persist preferences, continuing in memory");
            self.degraded = true;
        }
    }

    /// Unknown keys first, then the known fields over them.
    fn encode(&self) -> Result<String> {
        let mut object = self.unknown.clone();
        if let Value::Object(known) = serde_json::to_value(&self.preferences)? {
            object.extend(known);
        }
        Ok(serde_json::to_string_pretty(&Value::Object(object))?)
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("preferences", &self.preferences)
            .field("unknown", &self.unknown.len())
            .field("degraded", &self.degraded)
            .finish()
    }
}
