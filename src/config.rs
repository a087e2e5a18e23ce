use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::engine::reverse_mode::DEFAULT_REVERSE_STREAK;
use crate::generator::trial::DEFAULT_MAX_DISTRACTORS;
use crate::pool::Direction;

pub const DIRECTION_SETTINGS: &[&str] = &["adaptive", "forward", "reverse"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_word_length")]
    pub word_length: usize,
    #[serde(default = "default_max_distractors")]
    pub max_distractors: usize,
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default = "default_reverse_streak")]
    pub reverse_streak: u32,
    #[serde(default = "default_pool")]
    pub pool: String,
    #[serde(default = "default_stats_enabled")]
    pub stats_enabled: bool,
}

fn default_word_length() -> usize {
    3
}
fn default_max_distractors() -> usize {
    DEFAULT_MAX_DISTRACTORS
}
fn default_direction() -> String {
    "adaptive".to_string()
}
fn default_reverse_streak() -> u32 {
    DEFAULT_REVERSE_STREAK
}
fn default_pool() -> String {
    "hanzi-basic".to_string()
}
fn default_stats_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_length: default_word_length(),
            max_distractors: default_max_distractors(),
            direction: default_direction(),
            reverse_streak: default_reverse_streak(),
            pool: default_pool(),
            stats_enabled: default_stats_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize_direction();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordtiles")
            .join("config.toml")
    }

    /// Reset an unknown direction setting to the default.
    pub fn normalize_direction(&mut self) {
        self.direction = self.direction.trim().to_ascii_lowercase();
        if !DIRECTION_SETTINGS.contains(&self.direction.as_str()) {
            self.direction = default_direction();
        }
    }

    /// Apply a direction given on the command line. Unlike a config file value, an
    /// unknown name is an error rather than a reset.
    pub fn set_direction(&mut self, value: &str) -> Result<()> {
        let direction = value.trim().to_ascii_lowercase();
        if !DIRECTION_SETTINGS.contains(&direction.as_str()) {
            bail!("unknown direction {value:?}; expected one of {DIRECTION_SETTINGS:?}");
        }
        self.direction = direction;
        Ok(())
    }

    /// `None` means the direction is decided adaptively.
    pub fn direction_override(&self) -> Option<Direction> {
        Direction::from_name(&self.direction)
    }
}
