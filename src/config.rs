//! Runtime configuration shared by the CLI and the studio.
//!
//! Resolution order: defaults, then an optional JSON file, then
//! `PLANT_DOCTOR_*` environment variables. Command-line flags are applied
//! last by the binaries.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::preprocess::INPUT_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the studio listens on.
    pub bind_addr: String,
    /// Directory holding one sub-directory of artifacts per plant.
    pub model_root: PathBuf,
    /// Copies of the input image stacked along the batch axis.
    pub batch_size: usize,
    /// Side of the square canvas images are letterboxed onto.
    pub input_size: u32,
    /// Keep loaded models between predictions instead of reloading.
    pub cache_models: bool,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "127.0.0.1:7878".into(),
            model_root: PathBuf::from("model"),
            batch_size: 32,
            input_size: INPUT_SIZE,
            cache_models: false,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Reads a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }

    /// Defaults, overlaid with `path` when given, overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let mut config = match path {
            Some(p) => AppConfig::from_file(p)?,
            None => AppConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `PLANT_DOCTOR_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PLANT_DOCTOR_BIND") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("PLANT_DOCTOR_MODEL_ROOT") {
            self.model_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("PLANT_DOCTOR_BATCH_SIZE") {
            self.batch_size = v
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PLANT_DOCTOR_BATCH_SIZE", value: v.clone() })?;
        }
        if let Some(v) = lookup("PLANT_DOCTOR_CACHE_MODELS") {
            self.cache_models = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = lookup("PLANT_DOCTOR_LOG") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue { key: "batch_size", value: "0".into() });
        }
        if self.input_size == 0 {
            return Err(ConfigError::InvalidValue { key: "input_size", value: "0".into() });
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key: "bind_addr", value: self.bind_addr.clone() })
    }
}
