//! Runtime settings
//!
//! Read from `PLAYDECK_CONFIG` if set, otherwise `playdeck.json` next to the
//! executable. Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "PLAYDECK_CONFIG";
const CONFIG_FILE: &str = "playdeck.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display frame interval driving the continuous games
    pub frame_ms: u64,
    /// How long a notice stays on screen
    pub notice_ms: u64,
    pub scores_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            notice_ms: 2000,
            scores_file: beside_exe("playdeck.scores.json"),
            log_file: beside_exe("playdeck.log"),
        }
    }
}

impl Settings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    /// Load settings, falling back to defaults when the file is missing.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| beside_exe(CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

fn beside_exe(name: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(name);
        }
    }
    PathBuf::from(name)
}
