use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "wdi-dashboard.json";

/// How questions are laid out in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One question at a time, picked in the side panel.
    #[default]
    Single,
    /// Every question in its own collapsible section.
    All,
}

/// Startup settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub default_countries: Vec<String>,
    /// First year of the initial range, clamped to the data.
    pub start_year: i32,
    pub layout: Layout,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("world_bank_development_indicators.csv"),
            default_countries: ["United States", "China", "India", "Germany", "Brazil"]
                .into_iter()
                .map(String::from)
                .collect(),
            start_year: 1990,
            layout: Layout::Single,
        }
    }
}

impl DashboardConfig {
    /// Read `path`, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
