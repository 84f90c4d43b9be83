// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// readzen-session: Preference persistence and the reader session that ties
// preferences, cached raw text and the mounted tree together.

pub mod backend;
pub mod data_dir;
pub mod session;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, PreferenceBackend};
pub use session::ReaderSession;
pub use store::PreferenceStore;
