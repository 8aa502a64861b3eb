//! App manifest extraction
//!
//! Each installed app has `<library>/steamapps/appmanifest_<appid>.acf` with a
//! top-level `AppState` block. Fields are strings; numeric ones are parsed
//! leniently (anything unparseable reads as 0).

use serde::Serialize;
use std::path::Path;

use super::library::{manifest_paths, LibraryPath};
use crate::vdf::{self, Block};

/// One application in the catalog
///
/// Serializes to the catalog snapshot schema. The download counters are only
/// used by the downloads report and are not part of that schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppRecord {
    #[serde(rename = "appid")]
    pub app_id: u32,
    pub name: String,
    pub installed: bool,
    /// Empty when not installed
    pub library_path: String,
    #[serde(rename = "installdir")]
    pub install_dir: String,
    pub state_flags: i64,
    pub size_on_disk: i64,
    #[serde(skip)]
    pub bytes_downloaded: i64,
    #[serde(skip)]
    pub bytes_to_download: i64,
    #[serde(skip)]
    pub bytes_to_stage: i64,
    #[serde(rename = "cover")]
    pub cover_path: String,
}

impl AppRecord {
    /// A record for an owned app with no local manifest
    pub fn not_installed(app_id: u32, name: Option<&str>) -> Self {
        Self {
            app_id,
            name: name
                .map(str::to_owned)
                .unwrap_or_else(|| placeholder_name(app_id)),
            ..Self::default()
        }
    }

    /// Whether the name is the synthesized `App <appid>` fallback
    pub fn has_placeholder_name(&self) -> bool {
        self.name == placeholder_name(self.app_id)
    }
}

/// Name used when a manifest has none
pub fn placeholder_name(app_id: u32) -> String {
    format!("App {}", app_id)
}

/// Read one manifest into a record
///
/// Returns `None` for unreadable or malformed files, a missing `AppState`
/// block, or a missing/zero `appid`. Steam rewrites manifests while
/// downloading, so callers should skip and move on.
pub fn extract(manifest: &Path, library: &LibraryPath) -> Option<AppRecord> {
    let doc = match vdf::load_file(manifest) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Skipping manifest {}: {}", manifest.display(), e);
            return None;
        }
    };

    let record = from_document(&doc, &library.display_string());
    if record.is_none() {
        tracing::debug!("No usable AppState in {}", manifest.display());
    }
    record
}

/// Project a parsed manifest into a record installed in `library_path`
pub fn from_document(doc: &Block, library_path: &str) -> Option<AppRecord> {
    let state = doc.get_block("AppState")?;

    let app_id = state
        .get_str("appid")
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|id| *id != 0)?;

    let name = match state.get_str("name").map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => placeholder_name(app_id),
    };

    Some(AppRecord {
        app_id,
        name,
        installed: true,
        library_path: library_path.to_string(),
        install_dir: state.get_str("installdir").unwrap_or("").trim().to_string(),
        state_flags: int_field(state, "StateFlags"),
        size_on_disk: int_field(state, "SizeOnDisk"),
        bytes_downloaded: int_field(state, "BytesDownloaded"),
        bytes_to_download: int_field(state, "BytesToDownload"),
        bytes_to_stage: int_field(state, "BytesToStage"),
        cover_path: String::new(),
    })
}

fn int_field(state: &Block, key: &str) -> i64 {
    state
        .get_str(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Extract every manifest of every library, in library order
///
/// The same app can appear in more than one library; all copies are returned.
pub fn scan_installed(libraries: &[LibraryPath]) -> Vec<AppRecord> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for library in libraries {
        for manifest in manifest_paths(library) {
            match extract(&manifest, library) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
    }

    tracing::debug!(
        "Extracted {} app manifests ({} skipped)",
        records.len(),
        skipped
    );
    records
}
