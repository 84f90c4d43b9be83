// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ReadZen.

use thiserror::Error;

/// Top-level error type for all ReadZen operations.
///
/// Only the storage seam and a few parsing helpers produce these. The
/// rendering pipeline itself never fails: heuristic misses are normal
/// outcomes, not errors.
#[derive(Debug, Error)]
pub enum ReaderError {
    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("preference storage unavailable: {0}")]
    Storage(String),

    // -- Preferences --
    #[error("unknown reading profile: {0}")]
    UnknownProfile(String),

    #[error("invalid phoneme entry: {0}")]
    InvalidPhoneme(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReaderError>;
