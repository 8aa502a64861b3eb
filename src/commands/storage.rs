//! Storage command - Disk usage per Steam library
//!
//! Reports filesystem totals for each library alongside the space taken by
//! Steam's own subfolders, similar to the client's storage view.

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

use super::{utils, SnapshotOptions};
use crate::steam::{discover_library_paths, LibraryPath};

/// `steamapps` subfolders attributed to Steam
pub const STEAM_SUBDIRS: [&str; 5] = [
    "common",
    "compatdata",
    "shadercache",
    "workshop",
    "downloading",
];

/// Filesystem totals in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Storage report for one library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryUsage {
    pub path: String,
    pub fs_total: u64,
    pub fs_used: u64,
    pub fs_free: u64,
    pub steam_bytes: u64,
    pub steam_breakdown: IndexMap<String, u64>,
    pub other_bytes: u64,
}

/// Combine filesystem totals with the Steam breakdown
pub fn library_usage(path: &str, fs: FsUsage, breakdown: IndexMap<String, u64>) -> LibraryUsage {
    let steam_bytes: u64 = breakdown.values().sum();
    LibraryUsage {
        path: path.to_string(),
        fs_total: fs.total,
        fs_used: fs.used,
        fs_free: fs.free,
        steam_bytes,
        steam_breakdown: breakdown,
        other_bytes: fs.used.saturating_sub(steam_bytes),
    }
}

/// Size of each Steam subfolder under `steamapps`; missing ones are 0
pub fn steam_breakdown(steamapps: &Path) -> IndexMap<String, u64> {
    STEAM_SUBDIRS
        .iter()
        .map(|name| {
            (
                name.to_string(),
                utils::calculate_dir_size(&steamapps.join(name)),
            )
        })
        .collect()
}

/// Total, used and available bytes of the filesystem holding `path`
///
/// `used` counts all allocated blocks; `free` is what an unprivileged user
/// can still write.
#[cfg(unix)]
pub fn filesystem_usage(path: &Path) -> Result<FsUsage> {
    use anyhow::Context;
    use nix::sys::statvfs::statvfs;

    let stat =
        statvfs(path).with_context(|| format!("Failed to stat filesystem: {}", path.display()))?;
    let frsize = stat.fragment_size() as u64;
    let total = frsize * stat.blocks() as u64;
    let free = frsize * stat.blocks_available() as u64;
    let used = total.saturating_sub(frsize * stat.blocks_free() as u64);

    Ok(FsUsage { total, used, free })
}

#[cfg(not(unix))]
pub fn filesystem_usage(path: &Path) -> Result<FsUsage> {
    anyhow::bail!(
        "Filesystem usage is not supported on this platform: {}",
        path.display()
    )
}

/// Build the report for one library
pub fn report(library: &LibraryPath) -> Result<LibraryUsage> {
    let fs = filesystem_usage(library.path())?;
    let breakdown = steam_breakdown(&library.steamapps());
    Ok(library_usage(&library.display_string(), fs, breakdown))
}

#[derive(Debug, Serialize)]
struct StoragePayload {
    libraries: Vec<LibraryUsage>,
}

/// Execute the storage command
pub fn execute(options: SnapshotOptions) -> Result<()> {
    let interval = utils::parse_interval(options.interval)?;
    let steam_root = utils::resolve_steam_root(options.steam_root.as_deref())?;

    utils::run_passes(options.watch, interval, || {
        let mut libraries = Vec::new();
        for library in discover_library_paths(&steam_root) {
            match report(&library) {
                Ok(usage) => libraries.push(usage),
                Err(e) => tracing::warn!("Skipping {}: {:#}", library.path().display(), e),
            }
        }

        let count = libraries.len();
        utils::write_snapshot(
            &options.out,
            &utils::Snapshot::new(&steam_root, StoragePayload { libraries }),
        )?;
        tracing::info!(
            "Wrote storage report for {} libraries to {}",
            count,
            options.out.display()
        );
        Ok(())
    })
}
