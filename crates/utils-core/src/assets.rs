use std::path::PathBuf;

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
pub const ASSET_DIR_ENV: &str = "WORKBOARD_ASSET_DIR";

/// Directory holding the sqlite database, `config.json` and the mock data snapshots.
///
/// `WORKBOARD_ASSET_DIR` wins when set and non-empty. Debug builds otherwise use
/// `<workspace>/dev_assets`; release builds use the platform data directory.
pub fn asset_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(ASSET_DIR_ENV) {
        let override_dir = override_dir.trim();
        if !override_dir.is_empty() {
            return PathBuf::from(override_dir);
        }
    }

    if cfg!(debug_assertions) {
        return PathBuf::from(PROJECT_ROOT).join("../../dev_assets");
    }

    match ProjectDirs::from("dev", "workboard", "workboard") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            tracing::warn!("No home directory available; using ./workboard-data for assets");
            PathBuf::from("workboard-data")
        }
    }
    // Linux → ~/.local/share/workboard (respects XDG_DATA_HOME)
}

/// Same as [`asset_dir`] but creates the directory when it is missing.
pub fn ensure_asset_dir() -> std::io::Result<PathBuf> {
    let path = asset_dir();
    if !path.exists() {
        std::fs::create_dir_all(&path)?;
    }
    Ok(path)
}

pub fn config_path() -> PathBuf {
    asset_dir().join("config.json")
}

pub fn database_path() -> PathBuf {
    asset_dir().join("db.sqlite")
}

pub fn default_mock_data_dir() -> PathBuf {
    asset_dir().join("mock_data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_asset_dir() {
        let root = asset_dir();
        assert_eq!(config_path(), root.join("config.json"));
        assert_eq!(database_path(), root.join("db.sqlite"));
        assert_eq!(default_mock_data_dir(), root.join("mock_data"));
    }
}
