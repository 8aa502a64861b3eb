//! Library command - Write the merged game catalog

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::utils;
use crate::config;
use crate::steam::library::{manifest_fingerprint, ManifestFingerprint};
use crate::steam::{
    cover, discover_library_paths, merge, reconcile, scan_installed, webapi, AppRecord,
    LibraryPath, OwnedApp,
};

/// Options for the library command
pub struct LibraryOptions {
    /// Steam root override
    pub steam_root: Option<PathBuf>,
    /// Snapshot file to write
    pub out: PathBuf,
    /// Owned-games JSON file; overrides the Web API fetch
    pub owned: Option<PathBuf>,
    /// Keep running and rewrite when manifests change
    pub watch: bool,
    /// Poll interval in seconds
    pub interval: f64,
}

#[derive(Debug, Serialize)]
struct LibraryPayload {
    games: Vec<AppRecord>,
}

/// Scan `libraries`, merge with `owned` and attach covers from `steam_root`
pub fn build_catalog(
    steam_root: &Path,
    libraries: &[LibraryPath],
    owned: &[OwnedApp],
) -> Vec<AppRecord> {
    let mut catalog = merge(scan_installed(libraries), owned);
    cover::attach_covers(&mut catalog, steam_root);
    catalog
}

/// Owned apps from `--owned`, else from the Web API when credentials are set
///
/// An explicit file must load. A failed fetch is logged and yields an empty
/// list, so the installed catalog is still written.
pub fn resolve_owned(owned_file: Option<&Path>) -> Result<Vec<OwnedApp>> {
    if let Some(path) = owned_file {
        return reconcile::load_owned(path);
    }

    let Some(credentials) = config::web_api_credentials() else {
        tracing::debug!(
            "{} or {} not set; skipping owned-games fetch",
            config::STEAM_API_KEY_ENV,
            config::STEAM_ID64_ENV
        );
        return Ok(Vec::new());
    };

    Ok(webapi::fetch_owned_games(&credentials).unwrap_or_else(|e| {
        tracing::warn!("Owned-games fetch failed, using installed apps only: {:#}", e);
        Vec::new()
    }))
}

/// Write the catalog snapshot unless manifests are unchanged since `last_seen`
///
/// Returns whether the snapshot was written. `last_seen` only advances after
/// a successful write.
pub fn write_catalog(
    steam_root: &Path,
    owned: &[OwnedApp],
    out: &Path,
    last_seen: &mut Option<ManifestFingerprint>,
) -> Result<bool> {
    // Library folders can be added or removed between passes
    let libraries = discover_library_paths(steam_root);
    let fingerprint = manifest_fingerprint(&libraries);
    if *last_seen == Some(fingerprint) {
        return Ok(false);
    }

    let catalog = build_catalog(steam_root, &libraries, owned);
    let installed = catalog.iter().filter(|g| g.installed).count();
    let total = catalog.len();
    utils::write_snapshot(
        out,
        &utils::Snapshot::new(steam_root, LibraryPayload { games: catalog }),
    )?;

    tracing::info!(
        "Wrote {} games ({} installed) to {}",
        total,
        installed,
        out.display()
    );
    *last_seen = Some(fingerprint);
    Ok(true)
}

/// Execute the library command
pub fn execute(options: LibraryOptions) -> Result<()> {
    let interval = utils::parse_interval(options.interval)?;
    let steam_root = utils::resolve_steam_root(options.steam_root.as_deref())?;
    let owned = resolve_owned(options.owned.as_deref())?;
    let mut last_seen: Option<ManifestFingerprint> = None;

    utils::run_passes(options.watch, interval, || {
        write_catalog(&steam_root, &owned, &options.out, &mut last_seen).map(|_| ())
    })
}
