//! Where the notch keeps its files on disk.

use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "Notch";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const LOG_FILE_NAME: &str = "notch.log";

fn app_dir(base: Option<PathBuf>) -> Option<PathBuf> {
    base.map(|dir| dir.join(APP_DIR))
}

pub fn default_config_path() -> Option<PathBuf> {
    app_dir(dirs::config_dir()).map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Location of the log file, with its directory created. None when the platform has
/// no local data directory or it cannot be created.
pub fn prepare_log_file_path() -> Option<PathBuf> {
    let dir = app_dir(dirs::data_local_dir())?;
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_layout() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("Notch/config.yaml"));
        }
    }

    #[test]
    fn test_app_dir_joins_base() {
        assert_eq!(
            app_dir(Some(PathBuf::from("/data"))),
            Some(PathBuf::from("/data/Notch"))
        );
        assert_eq!(app_dir(None), None);
    }
}
