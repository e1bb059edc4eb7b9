use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "cubetime";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/cubetime`, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("solves.db"))
    }

    pub fn json_store_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("solves.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("cubetime.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_files_share_a_directory() {
        if let (Some(db), Some(json), Some(log)) =
            (AppDirs::db_path(), AppDirs::json_store_path(), AppDirs::log_path())
        {
            assert_eq!(db.parent(), json.parent());
            assert_eq!(db.parent(), log.parent());
            assert!(db.ends_with("solves.db"));
        }
    }
}
