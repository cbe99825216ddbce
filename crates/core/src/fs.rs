//! Filesystem checks

use std::path::Path;

use log::debug;

/// Check that a path exists and points at a regular file
///
/// The database is opened read-only and never created, so callers use this
/// to report a missing file before a connection is attempted.
pub fn is_file(path: &str) -> bool {
    let found = Path::new(path).is_file();
    if !found {
        debug!("no regular file at: {}", path);
    }
    found
}
