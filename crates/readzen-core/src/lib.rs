// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ReadZen: Core types, reading preferences, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod phonemes;
pub mod profiles;
pub mod types;

pub use config::Preferences;
pub use error::ReaderError;
pub use phonemes::PhonemeCatalog;
pub use profiles::{Profile, ProfilePatch, ProfilePresets};
pub use types::*;
