use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::schema::Variant;

/// Supported model artifact formats.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Random forest exported as JSON node arrays.
    #[default]
    Forest,
    /// Native gbdt-rs model file.
    Gbdt,
    /// XGBoost JSON tree dump with a `binary:logistic` objective.
    XgboostDump,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Forest => "forest",
            ModelKind::Gbdt => "gbdt",
            ModelKind::XgboostDump => "xgboost-dump",
        }
    }
}

impl FromStr for ModelKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forest" | "random-forest" => Ok(ModelKind::Forest),
            "gbdt" => Ok(ModelKind::Gbdt),
            "xgboost-dump" | "xgboost" => Ok(ModelKind::XgboostDump),
            _ => Err(SchemaError::UnknownModelKind(s.to_string())),
        }
    }
}

/// Where the trained model lives and how to read it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub path: PathBuf,
    /// Probability cut-off for score-producing models (gbdt, xgboost-dump).
    pub threshold: f32,
    /// Row width the gbdt and xgboost-dump models were trained on. Those
    /// artifacts do not record it, so rows are only checked when it is set.
    pub n_features: Option<usize>,
}

impl ModelConfig {
    pub fn new(kind: ModelKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Forest,
            path: PathBuf::from("thyroid_cancer_rf_model.json"),
            threshold: 0.5,
            n_features: None,
        }
    }
}

/// Everything needed to build a [`crate::pipeline::RecurrencePipeline`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub variant: Variant,
    pub model: ModelConfig,
    /// Persisted training-time column order, used by the dataset variant.
    pub training_columns: Option<PathBuf>,
}
