//! Platform-specific configuration and paths

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides Steam root discovery
pub const STEAM_ROOT_ENV: &str = "STEAM_ROOT";

/// Steam Web API key for the owned-games fetch
pub const STEAM_API_KEY_ENV: &str = "STEAM_API_KEY";

/// SteamID64 of the account whose owned games are fetched
pub const STEAM_ID64_ENV: &str = "STEAM_ID64";

/// Conventional Steam roots relative to the home directory, in lookup order
/// - ~/.steam/root (symlink maintained by the Steam client)
/// - ~/.local/share/Steam (native install)
/// - ~/.steam/steam (legacy symlink)
const HOME_ROOTS: [&[&str]; 3] = [
    &[".steam", "root"],
    &[".local", "share", "Steam"],
    &[".steam", "steam"],
];

/// Ordered list of Steam root candidates for this machine
///
/// An explicit override (e.g. `--steam-root`) comes first, then `STEAM_ROOT`,
/// then the conventional locations under the home directory.
pub fn steam_root_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    root_candidates(
        explicit,
        env::var_os(STEAM_ROOT_ENV),
        dirs::home_dir().as_deref(),
    )
}

/// Build the candidate list from explicit inputs
pub fn root_candidates(
    explicit: Option<&Path>,
    env_root: Option<OsString>,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        candidates.push(expand_tilde(path));
    }

    if let Some(value) = env_root.filter(|v| !v.is_empty()) {
        candidates.push(expand_tilde(Path::new(&value)));
    }

    if let Some(home) = home {
        for parts in HOME_ROOTS {
            candidates.push(parts.iter().fold(home.to_path_buf(), |p, c| p.join(c)));
        }
    }

    candidates
}

/// Credentials for the Steam Web API
///
/// No `Debug` impl so the key cannot end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct WebApiCredentials {
    pub api_key: String,
    pub steam_id: String,
}

/// Web API credentials from `STEAM_API_KEY` and `STEAM_ID64`, if both are set
pub fn web_api_credentials() -> Option<WebApiCredentials> {
    credentials_from(
        env::var(STEAM_API_KEY_ENV).ok(),
        env::var(STEAM_ID64_ENV).ok(),
    )
}

/// Build credentials from raw values; blank values count as unset
pub fn credentials_from(
    api_key: Option<String>,
    steam_id: Option<String>,
) -> Option<WebApiCredentials> {
    let non_blank = |v: String| {
        let v = v.trim().to_string();
        (!v.is_empty()).then_some(v)
    };

    Some(WebApiCredentials {
        api_key: api_key.and_then(non_blank)?,
        steam_id: steam_id.and_then(non_blank)?,
    })
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let candidates = root_candidates(
            Some(Path::new("/opt/steam")),
            Some(OsString::from("/srv/steam")),
            Some(Path::new("/home/deck")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/opt/steam"),
                PathBuf::from("/srv/steam"),
                PathBuf::from("/home/deck/.steam/root"),
                PathBuf::from("/home/deck/.local/share/Steam"),
                PathBuf::from("/home/deck/.steam/steam"),
            ]
        );
    }

    #[test]
    fn test_empty_env_ignored() {
        let candidates = root_candidates(None, Some(OsString::new()), None);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_credentials_need_both_values() {
        let creds = credentials_from(Some(" KEY ".into()), Some("7656".into())).unwrap();
        assert_eq!(creds.api_key, "KEY");
        assert_eq!(creds.steam_id, "7656");

        assert!(credentials_from(Some("KEY".into()), None).is_none());
        assert!(credentials_from(None, Some("7656".into())).is_none());
        assert!(credentials_from(Some("KEY".into()), Some("  ".into())).is_none());
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(
            expand_tilde(Path::new("/mnt/sd/SteamLibrary")),
            PathBuf::from("/mnt/sd/SteamLibrary")
        );
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/Games")), home.join("Games"));
        }
    }

    #[test]
    fn test_paths_exist() {
        // Should not panic without a home directory
        let _ = steam_root_candidates(None);
    }
}
