//! Encode, assemble, predict and interpret in one place.
//!
//! A [`RecurrencePipeline`] is built once at startup and then shared
//! read-only between requests.
use anyhow::{Context, Result};

use crate::assembler::{assemble, reindex, FeatureRow, FieldDefault, FormInput, TrainingColumns};
use crate::config::PipelineConfig;
use crate::encoding::EncodingTable;
use crate::error::ModelError;
use crate::models::classifier_trait::RecurrenceModel;
use crate::models::factory::load_model;
use crate::prediction::{Label, Prediction};
use crate::schema::Variant;

/// Outcome of assessing one form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub prediction: Prediction,
    pub label: Label,
    /// The row exactly as handed to the model.
    pub row: FeatureRow,
    pub defaults: Vec<FieldDefault>,
}

impl Assessment {
    pub fn message(&self) -> &'static str {
        self.prediction.message()
    }
}

pub struct RecurrencePipeline {
    variant: Variant,
    table: EncodingTable,
    training_columns: Option<TrainingColumns>,
    model: Box<dyn RecurrenceModel>,
}

impl RecurrencePipeline {
    pub fn new(variant: Variant, model: Box<dyn RecurrenceModel>) -> Self {
        RecurrencePipeline {
            variant,
            table: EncodingTable::for_variant(variant),
            training_columns: None,
            model,
        }
    }

    /// Reindex rows against persisted training columns. Ignored, with a
    /// warning, for variants that do not reindex.
    pub fn with_training_columns(mut self, columns: TrainingColumns) -> Self {
        if self.variant.supports_reindex() {
            self.training_columns = Some(columns);
        } else {
            log::warn!(
                "Variant '{}' does not reindex; ignoring {} training columns",
                self.variant,
                columns.len()
            );
        }
        self
    }

    /// Load the model and optional training columns named by `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let model = load_model(&config.model).with_context(|| {
            format!(
                "Failed to load {} model from {}",
                config.model.kind.as_str(),
                config.model.path.display()
            )
        })?;
        let mut pipeline = Self::new(config.variant, model);

        if let Some(path) = &config.training_columns {
            let columns = TrainingColumns::load(path)?;
            log::info!(
                "Loaded {} training columns from {}",
                columns.len(),
                path.display()
            );
            pipeline = pipeline.with_training_columns(columns);
        }

        log::info!(
            "Pipeline ready: variant={}, model={}, reindex={}",
            pipeline.variant,
            pipeline.model.name(),
            pipeline.training_columns.is_some()
        );
        Ok(pipeline)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn table(&self) -> &EncodingTable {
        &self.table
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Build the exact row the model will see for `form`.
    pub fn features(&self, form: &FormInput) -> (FeatureRow, Vec<FieldDefault>) {
        let assembled = assemble(&self.table, form);
        let row = match &self.training_columns {
            Some(columns) => reindex(&assembled.row, columns.as_slice()),
            None => assembled.row,
        };
        (row, assembled.defaults)
    }

    pub fn assess(&self, form: &FormInput) -> Result<Assessment, ModelError> {
        let (row, defaults) = self.features(form);
        if !defaults.is_empty() {
            log::info!("{} of {} fields defaulted to 0", defaults.len(), row.len());
        }

        let label = self.model.predict(&row)?;
        let prediction = self.variant.label_rule().interpret(&label);
        log::debug!("Model '{}' returned {:?} -> {:?}", self.model.name(), label, prediction);

        Ok(Assessment {
            prediction,
            label,
            row,
            defaults,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FEATURE_NAMES;

    struct EchoSmoking;

    impl RecurrenceModel for EchoSmoking {
        fn predict(&self, row: &FeatureRow) -> Result<Label, ModelError> {
            Ok(Label::Integer(row.get("Smoking").unwrap_or(-1.0) as i64))
        }
    }

    #[test]
    fn dataset_variant_reindexes_when_columns_given() {
        let columns = TrainingColumns::new(vec![
            "Smoking".to_string(),
            "Recurred Before".to_string(),
        ]);
        let pipeline = RecurrencePipeline::new(Variant::Dataset, Box::new(EchoSmoking))
            .with_training_columns(columns);

        let form = FormInput::new().with("Smoking", "Yes");
        let (row, _) = pipeline.features(&form);
        assert_eq!(row.columns, vec!["Smoking", "Recurred Before"]);
        assert_eq!(row.values, vec![1.0, 0.0]);

        let assessment = pipeline.assess(&form).unwrap();
        assert_eq!(assessment.prediction, Prediction::Recurrence);
    }

    #[test]
    fn lowercase_variant_ignores_training_columns() {
        let pipeline = RecurrencePipeline::new(Variant::Lowercase, Box::new(EchoSmoking))
            .with_training_columns(TrainingColumns::new(vec!["Smoking".to_string()]));
        let (row, defaults) = pipeline.features(&FormInput::new());
        assert_eq!(row.len(), FEATURE_NAMES.len());
        assert_eq!(defaults.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn lowercase_variant_reads_integer_zero_as_recurrence() {
        let pipeline = RecurrencePipeline::new(Variant::Lowercase, Box::new(EchoSmoking));
        let assessment = pipeline.assess(&FormInput::new()).unwrap();
        assert_eq!(assessment.label, Label::Integer(0));
        assert_eq!(assessment.prediction, Prediction::Recurrence);
    }
}
