use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::layout::LayoutParams;
use crate::validator::TimeRange;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub min_time: String,
    pub max_time: String,
    pub container_radius: f64,
    pub element_half_size: f64,
}

impl Default for Config {
    fn default() -> Self {
        let layout = LayoutParams::default();
        Self {
            min_time: "01:00".to_string(),
            max_time: "03:00".to_string(),
            container_radius: layout.container_radius,
            element_half_size: layout.element_half_size,
        }
    }
}

impl Config {
    /// Command line values win over the file.
    pub fn with_overrides(mut self, min_time: Option<String>, max_time: Option<String>) -> Self {
        if let Some(min) = min_time {
            self.min_time = min;
        }
        if let Some(max) = max_time {
            self.max_time = max;
        }
        self
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(&self.min_time, &self.max_time)
    }

    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            container_radius: self.container_radius,
            element_half_size: self.element_half_size,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

/// Read-only JSON config; a missing or broken file falls back to defaults
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }
}
