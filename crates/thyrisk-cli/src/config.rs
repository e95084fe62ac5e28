use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use thyrisk_classifiers::config::{ModelConfig, ModelKind, PipelineConfig};
use thyrisk_classifiers::schema::Variant;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub version: String,
    pub bind_address: String,
    pub variant: Variant,
    pub model: ModelConfig,
    pub training_columns: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            version: clap::crate_version!().to_string(),
            bind_address: String::from("127.0.0.1:5000"),
            variant: Variant::Lowercase,
            model: ModelConfig::default(),
            training_columns: None,
        }
    }
}

impl ServerConfig {
    /// Read a JSON config, keeping the default for every field that is
    /// missing or fails to parse.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        let mut config = ServerConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            stringify!($field), config.$field
                        );
                    }
                } else {
                    log::warn!(
                        "Config Missing field '{}', using default: {:?}",
                        stringify!($field), config.$field
                    );
                }
            };
        }

        load_or_default!(bind_address);
        load_or_default!(variant);
        load_or_default!(model);
        load_or_default!(training_columns);

        Ok(config)
    }

    /// Load `config_path` (or defaults) and apply CLI overrides from `matches`.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => ServerConfig::default(),
        };
        config.apply_overrides(matches)?;
        Ok(config)
    }

    /// Apply the override flags that `matches` defines; absent flags are skipped.
    pub fn apply_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(path) = arg::<PathBuf>(matches, "model_path") {
            self.model.path = path.clone();
        }
        if let Some(kind) = arg::<String>(matches, "model_kind") {
            self.model.kind = ModelKind::from_str(kind)?;
        }
        if let Some(threshold) = arg::<f32>(matches, "threshold") {
            self.model.threshold = *threshold;
        }
        if let Some(n_features) = arg::<usize>(matches, "n_features") {
            self.model.n_features = Some(*n_features);
        }
        if let Some(variant) = arg::<String>(matches, "variant") {
            self.variant = Variant::from_str(variant)?;
        }
        if let Some(columns) = arg::<PathBuf>(matches, "training_columns") {
            self.training_columns = Some(columns.clone());
        }
        if let Some(bind) = arg::<String>(matches, "bind") {
            self.bind_address = bind.clone();
        }
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            variant: self.variant,
            model: self.model.clone(),
            training_columns: self.training_columns.clone(),
        }
    }
}

/// Subcommands define different flag sets, so unknown ids read as unset.
fn arg<'a, T>(matches: &'a ArgMatches, id: &str) -> Option<&'a T>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    matches.try_get_one::<T>(id).ok().flatten()
}
