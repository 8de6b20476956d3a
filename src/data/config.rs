use crate::audio::AnalysisConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "SPECTRUM_PLAYER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_ui_fps")]
    pub ui_fps: u32,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_ui_fps() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self { ui_fps: default_ui_fps(), analysis: AnalysisConfig::default() }
    }
}

impl Config {
    /// Loads the first config file found; a missing or broken file falls
    /// back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(cfg) => {
                log::info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg = toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    fn default_path() -> Option<PathBuf> {
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(p));
        }
        let rel = PathBuf::from("config/default.toml");
        resolve_asset_path(&rel).or_else(|| {
            let dirs = directories::ProjectDirs::from("", "", "spectrum-player")?;
            let p = dirs.config_dir().join("config.toml");
            p.exists().then_some(p)
        })
    }
}

fn resolve_asset_path(rel: &Path) -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        let mut cur = exe.parent();
        for _ in 0..6 {
            let Some(dir) = cur else { break };
            let p = dir.join(rel);
            if p.exists() {
                return Some(p);
            }
            cur = dir.parent();
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let p = cwd.join(rel);
        if p.exists() {
            return Some(p);
        }
    }

    None
}
