//! TOML-based application configuration.
//!
//! Stores:
//! - Per-question time budgets and the warning threshold
//! - The advance policy after a timeout
//! - Where question sets are loaded from and which one plays first
//!
//! Configuration is stored at `~/.config/bioskills/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `BIOSKILLS_HOME` overrides the location outright. Otherwise this is
/// `~/.config/bioskills/`, or `~/.config/bioskills-dev/` when
/// `BIOSKILLS_ENV=dev`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("BIOSKILLS_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("BIOSKILLS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("bioskills-dev")
            } else {
                base_dir.join("bioskills")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Quiz timing and flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Seconds per question in a standard set.
    #[serde(default = "default_time_per_question")]
    pub time_per_question: u32,
    /// Seconds per question in a calculation set.
    #[serde(default = "default_time_per_calculation_question")]
    pub time_per_calculation_question: u32,
    /// Remaining seconds at which the countdown is flagged as urgent.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: u32,
    /// Advance to the next question by itself after a timeout.
    #[serde(default)]
    pub auto_advance: bool,
}

/// Question-set sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetsConfig {
    #[serde(default = "default_set")]
    pub default_set: String,
    /// Directory or base URL that set names are resolved against.
    #[serde(default = "default_source")]
    pub source: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/bioskills/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub sets: SetsConfig,
}

fn default_time_per_question() -> u32 {
    20
}
fn default_time_per_calculation_question() -> u32 {
    60
}
fn default_warning_threshold() -> u32 {
    10
}
fn default_set() -> String {
    "Set-1-questions.json".into()
}
fn default_source() -> String {
    "questions".into()
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_per_question: default_time_per_question(),
            time_per_calculation_question: default_time_per_calculation_question(),
            warning_threshold: default_warning_threshold(),
            auto_advance: false,
        }
    }
}

impl Default for SetsConfig {
    fn default() -> Self {
        Self {
            default_set: default_set(),
            source: default_source(),
        }
    }
}

impl QuizConfig {
    /// Time budget for a set.
    pub fn budget_for(&self, calculation: bool) -> u32 {
        if calculation {
            self.time_per_calculation_question
        } else {
            self.time_per_question
        }
    }
}

impl Config {
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    /// Replace the value at a dot path, parsing `raw` to the type already
    /// stored there.
    fn assign(root: &mut serde_json::Value, key: &str, raw: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let value = match existing {
            serde_json::Value::Bool(_) => raw
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::Number(_) => raw
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{raw}' as a whole number")))?,
            serde_json::Value::String(_) => serde_json::Value::String(raw.into()),
            _ => return Err(unknown()),
        };
        obj.insert(leaf.to_string(), value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::lookup(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory. Callers persist with `save`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::assign(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
