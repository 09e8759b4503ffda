//! Runtime configuration, optionally read from a TOML file.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the collections live and how deep the actor queues are.
///
/// Missing fields take their defaults, so an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the three collection files.
    pub data_dir: PathBuf,

    pub available_orders_file: String,

    pub refunded_orders_file: String,

    pub pick_up_points_file: String,

    /// Capacity of each actor's request channel.
    pub channel_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            available_orders_file: "available_orders.json".to_string(),
            refunded_orders_file: "refunded_orders.json".to_string(),
            pick_up_points_file: "pick_up_points.json".to_string(),
            channel_buffer: 32,
        }
    }
}

impl Config {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_buffer == 0 {
            return Err(anyhow!("channel_buffer must be > 0"));
        }
        let files = [
            ("available_orders_file", &self.available_orders_file),
            ("refunded_orders_file", &self.refunded_orders_file),
            ("pick_up_points_file", &self.pick_up_points_file),
        ];
        for (field, name) in files {
            if name.trim().is_empty() {
                return Err(anyhow!("{field} must not be empty"));
            }
        }
        if self.available_orders_file == self.refunded_orders_file {
            return Err(anyhow!(
                "available_orders_file and refunded_orders_file must differ"
            ));
        }
        Ok(())
    }

    pub fn available_orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.available_orders_file)
    }

    pub fn refunded_orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.refunded_orders_file)
    }

    pub fn pick_up_points_path(&self) -> PathBuf {
        self.data_dir.join(&self.pick_up_points_file)
    }

    /// Loads config from a TOML file.
    ///
    /// If the file is missing, returns `Config::default()`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let cfg = Self::default();
            cfg.validate()?;
            return Ok(cfg);
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Self =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
