use crate::assembler::FeatureRow;
use crate::error::ModelError;
use crate::prediction::Label;

/// A small trait abstraction over an externally trained classifier.
///
/// Models are loaded once at startup and shared read-only between requests,
/// so implementations must be `Send + Sync` and `predict` takes `&self`.
pub trait RecurrenceModel: Send + Sync {
    /// Predict the class label for a single encoded row.
    fn predict(&self, row: &FeatureRow) -> Result<Label, ModelError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
