use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "letterwheel")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("letterwheel_config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("letterwheel");
            Some(state_dir.join("letterwheel.log"))
        } else {
            ProjectDirs::from("", "", "letterwheel")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("letterwheel.log"))
        }
    }
}
