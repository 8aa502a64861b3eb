//! Steam root and library folder discovery
//!
//! A library is any directory containing `steamapps/`. The root library is
//! the Steam installation itself; extra libraries (SD cards, other drives) are
//! listed in `<root>/steamapps/libraryfolders.vdf`:
//!
//! ```text
//! "libraryfolders"
//! {
//!     "0" { "path" "/home/deck/.local/share/Steam" ... }
//!     "1" { "path" "/run/media/mmcblk0p1" ... }
//! }
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config;
use crate::vdf;

/// Failure to locate any Steam installation
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error(
        "could not locate a Steam installation ({} candidates tried); set STEAM_ROOT=/path/to/Steam",
        .tried.len()
    )]
    RootNotFound { tried: Vec<PathBuf> },
}

/// A directory known to contain `steamapps/`
///
/// Holds the resolved path, so two spellings of the same directory compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LibraryPath(PathBuf);

impl LibraryPath {
    /// Returns `None` unless `path/steamapps` is a directory
    pub fn new<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        if !path.join("steamapps").is_dir() {
            return None;
        }
        let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Some(Self(resolved))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn steamapps(&self) -> PathBuf {
        self.0.join("steamapps")
    }

    /// The path as written into snapshots
    pub fn display_string(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

/// Pick the Steam root from an ordered candidate list
///
/// The first candidate with a `steamapps` directory wins. Failing that, the
/// first candidate that exists at all is used.
pub fn find_root(candidates: &[PathBuf]) -> Result<PathBuf, LocateError> {
    let with_steamapps = |c: &&PathBuf| c.join("steamapps").is_dir();
    let exists = |c: &&PathBuf| c.exists();

    let root = candidates
        .iter()
        .find(with_steamapps)
        .or_else(|| candidates.iter().find(exists))
        .cloned();

    match root {
        Some(root) => {
            tracing::debug!("Using Steam root {}", root.display());
            Ok(root)
        }
        None => Err(LocateError::RootNotFound {
            tried: candidates.to_vec(),
        }),
    }
}

/// Enumerate library folders, root first, without duplicates
///
/// A missing or malformed `libraryfolders.vdf` leaves just the root.
pub fn discover_library_paths(root: &Path) -> Vec<LibraryPath> {
    let mut libraries: Vec<LibraryPath> = Vec::new();

    let listed = descriptor_paths(root)
        .into_iter()
        .map(|p| config::expand_tilde(Path::new(&p)));

    for candidate in std::iter::once(root.to_path_buf()).chain(listed) {
        match LibraryPath::new(&candidate) {
            Some(library) if !libraries.contains(&library) => libraries.push(library),
            Some(_) => {}
            None => tracing::debug!(
                "Skipping library without steamapps: {}",
                candidate.display()
            ),
        }
    }

    tracing::debug!("Discovered {} Steam libraries", libraries.len());
    libraries
}

/// `path` values listed in `libraryfolders.vdf`, in file order
fn descriptor_paths(root: &Path) -> Vec<String> {
    let descriptor = root.join("steamapps").join("libraryfolders.vdf");
    if !descriptor.exists() {
        return Vec::new();
    }

    let doc = match vdf::load_file(&descriptor) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", descriptor.display(), e);
            return Vec::new();
        }
    };

    let Some(folders) = doc.get_block("libraryfolders") else {
        tracing::warn!("No libraryfolders block in {}", descriptor.display());
        return Vec::new();
    };

    folders
        .iter()
        .filter_map(|(_, node)| node.as_block())
        .filter_map(|folder| folder.get_str("path"))
        .filter(|path| !path.is_empty())
        .map(str::to_owned)
        .collect()
}

/// All `appmanifest_*.acf` files in a library, sorted by file name
pub fn manifest_paths(library: &LibraryPath) -> Vec<PathBuf> {
    let steamapps = library.steamapps();
    let entries = match fs::read_dir(&steamapps) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", steamapps.display(), e);
            return Vec::new();
        }
    };

    let mut manifests: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_manifest_name(path))
        .collect();
    manifests.sort();
    manifests
}

fn is_manifest_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("appmanifest_") && n.ends_with(".acf"))
}

/// Cheap change detector over all manifests: (count, newest mtime)
///
/// Removing a manifest changes the count even when the newest mtime stays
/// the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestFingerprint {
    pub count: usize,
    pub newest: Option<SystemTime>,
}

pub fn manifest_fingerprint(libraries: &[LibraryPath]) -> ManifestFingerprint {
    libraries
        .iter()
        .flat_map(manifest_paths)
        .fold(ManifestFingerprint::default(), |acc, path| {
            let mtime = fs::metadata(&path).and_then(|m| m.modified()).ok();
            ManifestFingerprint {
                count: acc.count + 1,
                newest: acc.newest.max(mtime),
            }
        })
}
