//! Downloads command - Report in-progress downloads and updates
//!
//! Steam has no supported local API for download progress. The byte
//! counters in app manifests (`BytesDownloaded`, `BytesToDownload`,
//! `BytesToStage`) are undocumented, so progress is a best-effort hint.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::{utils, SnapshotOptions};
use crate::steam::library::{manifest_fingerprint, ManifestFingerprint};
use crate::steam::{discover_library_paths, scan_installed, AppRecord};

/// One app with pending bytes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadEntry {
    #[serde(rename = "appid")]
    pub app_id: u32,
    pub name: String,
    pub library_path: String,
    pub bytes_downloaded: i64,
    pub bytes_to_download: i64,
    pub bytes_to_stage: i64,
    pub total_bytes: i64,
    /// Fraction in `[0.0, 1.0]`
    pub progress: f64,
    pub state_flags: i64,
}

/// Download view of a record, or `None` when nothing is pending
pub fn download_entry(record: &AppRecord) -> Option<DownloadEntry> {
    if record.bytes_to_download <= 0 && record.bytes_to_stage <= 0 {
        return None;
    }

    let total = record
        .bytes_downloaded
        .saturating_add(record.bytes_to_download.max(0));
    let progress = if total > 0 {
        (record.bytes_downloaded as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(DownloadEntry {
        app_id: record.app_id,
        name: record.name.clone(),
        library_path: record.library_path.clone(),
        bytes_downloaded: record.bytes_downloaded,
        bytes_to_download: record.bytes_to_download,
        bytes_to_stage: record.bytes_to_stage,
        total_bytes: total,
        progress,
        state_flags: record.state_flags,
    })
}

/// Active downloads, most complete first, then by name and app id
pub fn downloads_view(records: &[AppRecord]) -> Vec<DownloadEntry> {
    let mut downloads: Vec<DownloadEntry> = records.iter().filter_map(download_entry).collect();
    downloads.sort_by(|a, b| {
        b.progress
            .total_cmp(&a.progress)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.app_id.cmp(&b.app_id))
    });
    downloads
}

#[derive(Debug, Serialize)]
struct DownloadsPayload {
    downloads: Vec<DownloadEntry>,
}

/// Write the downloads snapshot unless manifests are unchanged since `last_seen`
///
/// Returns whether the snapshot was written.
pub fn write_downloads(
    steam_root: &Path,
    out: &Path,
    last_seen: &mut Option<ManifestFingerprint>,
) -> Result<bool> {
    let libraries = discover_library_paths(steam_root);
    let fingerprint = manifest_fingerprint(&libraries);
    if *last_seen == Some(fingerprint) {
        return Ok(false);
    }

    let downloads = downloads_view(&scan_installed(&libraries));
    let active = downloads.len();
    utils::write_snapshot(
        out,
        &utils::Snapshot::new(steam_root, DownloadsPayload { downloads }),
    )?;

    tracing::info!("Wrote {} active downloads to {}", active, out.display());
    *last_seen = Some(fingerprint);
    Ok(true)
}

/// Execute the downloads command
pub fn execute(options: SnapshotOptions) -> Result<()> {
    let interval = utils::parse_interval(options.interval)?;
    let steam_root = utils::resolve_steam_root(options.steam_root.as_deref())?;
    let mut last_seen: Option<ManifestFingerprint> = None;

    utils::run_passes(options.watch, interval, || {
        write_downloads(&steam_root, &options.out, &mut last_seen).map(|_| ())
    })
}
