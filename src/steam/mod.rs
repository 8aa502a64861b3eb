//! Steam installation layout
//!
//! Library discovery, app manifests, cover art, the Web API owned-games
//! list and the merged catalog built from them.

pub mod cover;
pub mod library;
pub mod manifest;
pub mod reconcile;
pub mod webapi;

pub use library::{discover_library_paths, find_root, LibraryPath, LocateError};
pub use manifest::{extract, scan_installed, AppRecord};
pub use reconcile::{merge, OwnedApp};
