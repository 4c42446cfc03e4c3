// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup cleanup of stale browser lock files under the session directory.
//!
//! An unclean shutdown leaves `Singleton*` files behind that make the next
//! bridge start fail with "profile in use". Cleanup is best-effort and
//! non-critical: every failure is logged and ignored.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

/// Recursively remove `Singleton*` files under `dir`.
pub fn cleanup_session_locks(dir: &Path) {
    if !dir.exists() {
        debug!(path = %dir.display(), "session path missing; lock cleanup skipped");
        return;
    }
    if let Err(e) = sweep(dir) {
        warn!(path = %dir.display(), error = %e, "lock cleanup failed (non-critical)");
    }
}

fn sweep(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            sweep(&path)?;
        } else if entry.file_name().to_string_lossy().starts_with("Singleton") {
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "removed stale lock file"),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove lock file"),
            }
        }
    }
    Ok(())
}
