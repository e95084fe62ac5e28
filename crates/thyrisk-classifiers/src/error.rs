use std::error::Error;
use std::fmt;

/// Errors raised by model adapters while loading or predicting.
#[derive(Debug)]
pub enum ModelError {
    /// The row handed to the model has the wrong number of features.
    ShapeMismatch { expected: usize, found: usize },
    /// The persisted artifact is structurally invalid.
    InvalidArtifact(String),
    /// The underlying model library failed.
    Backend(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::ShapeMismatch { expected, found } => write!(
                f,
                "Model expects {} features but the row has {}",
                expected, found
            ),
            ModelError::InvalidArtifact(msg) => write!(f, "Invalid model artifact: {}", msg),
            ModelError::Backend(msg) => write!(f, "Model backend failure: {}", msg),
        }
    }
}

impl Error for ModelError {}

/// Errors raised when parsing schema-level names from configuration or the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    UnknownVariant(String),
    UnknownModelKind(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::UnknownVariant(s) => write!(
                f,
                "Unknown variant: {}. Expected one of: lowercase, dataset",
                s
            ),
            SchemaError::UnknownModelKind(s) => write!(
                f,
                "Unknown model kind: {}. Expected one of: forest, gbdt, xgboost-dump",
                s
            ),
        }
    }
}

impl Error for SchemaError {}
