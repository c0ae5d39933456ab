use std::path::PathBuf;

/// Port the visitor-facing terminal server listens on unless overridden.
pub const DEFAULT_PORT: u16 = 2222;

const APP_DIR: &str = "kloom";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/kloom/ (XDG standard)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Default location of the show catalog.
///
/// A `shows.json` (or `data/shows.json`) beside the executable wins over the
/// data directory, so a bundled deployment works without configuration.
pub fn default_catalog_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            for candidate in [dir.join("shows.json"), dir.join("data").join("shows.json")] {
                if candidate.exists() {
                    return candidate;
                }
            }
        }
    }
    data_dir().join("shows.json")
}
