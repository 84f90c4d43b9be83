// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution for stored preferences.

use std::path::PathBuf;

/// Name of the preferences file inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

const APP_DIR: &str = "readzen";

/// Return the application data directory.
///
/// The directory is not created here; the file backend creates it on the
/// first write so that a read-only session never touches the filesystem.
pub fn data_dir() -> PathBuf {
    resolve(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Default location of the preferences file.
pub fn preferences_path() -> PathBuf {
    data_dir().join(PREFERENCES_FILE)
}

fn resolve(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    base_dir(xdg_data_home, home).join(APP_DIR)
}

fn base_dir(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // XDG wants absolute paths; a relative value is treated as unset.
    if let Some(xdg) = xdg_data_home.filter(|p| p.is_absolute()) {
        return xdg;
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".local").join("share");
    }
    std::env::temp_dir()
}
