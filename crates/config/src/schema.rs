use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utils_core::assets::default_mock_data_dir;

pub const CURRENT_CONFIG_VERSION: &str = "v1";

/// Which data provider the report endpoints read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportSourceMode {
    /// Live store when it holds at least one ticket, mock snapshots otherwise.
    #[default]
    Auto,
    Live,
    Fallback,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub config_version: String,
    #[serde(default)]
    pub report_source: ReportSourceMode,
    #[serde(default)]
    pub mock_data_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        if matches!(
            self.mock_data_dir.as_deref(),
            Some(path) if path.as_os_str().to_string_lossy().trim().is_empty()
        ) {
            self.mock_data_dir = None;
        }

        self
    }

    pub fn resolved_mock_data_dir(&self) -> PathBuf {
        self.mock_data_dir
            .clone()
            .unwrap_or_else(default_mock_data_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            report_source: ReportSourceMode::default(),
            mock_data_dir: None,
        }
    }
}
