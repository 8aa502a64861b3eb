//! Local cover art lookup
//!
//! The Steam client caches library artwork under
//! `<root>/appcache/librarycache/`. Names vary by client version, so a fixed
//! list of candidates is tried in order.

use std::path::{Path, PathBuf};

use super::manifest::AppRecord;

/// Artwork suffixes in preference order: portrait capsule first, header last
const COVER_SUFFIXES: [&str; 6] = [
    "library_600x900.jpg",
    "library_600x900.png",
    "library_capsule.jpg",
    "library_capsule.png",
    "header.jpg",
    "header.png",
];

/// Candidate cover files for an app, most preferred first
pub fn cover_candidates(steam_root: &Path, app_id: u32) -> Vec<PathBuf> {
    let cache = steam_root.join("appcache").join("librarycache");
    COVER_SUFFIXES
        .iter()
        .map(|suffix| cache.join(format!("{}_{}", app_id, suffix)))
        .collect()
}

/// First existing cover file, or an empty string
pub fn find_cover(steam_root: &Path, app_id: u32) -> String {
    if !steam_root.join("appcache").join("librarycache").is_dir() {
        return String::new();
    }

    cover_candidates(steam_root, app_id)
        .into_iter()
        .find(|c| c.exists())
        .map(|c| c.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Fill in covers for records that have none
pub fn attach_covers(records: &mut [AppRecord], steam_root: &Path) {
    for record in records.iter_mut().filter(|r| r.cover_path.is_empty()) {
        record.cover_path = find_cover(steam_root, record.app_id);
    }
}
