use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::{anyhow, Result};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::assembler::FeatureRow;
use crate::error::ModelError;
use crate::models::classifier_trait::RecurrenceModel;
use crate::prediction::Label;

/// Gradient Boosting Decision Tree (GBDT) classifier loaded from disk.
///
/// The boosted model produces a probability for the positive class; labels
/// are `Integer(1)` at or above `threshold` and `Integer(0)` below it.
pub struct GbdtClassifier {
    model: GBDT,
    threshold: f32,
    n_features: Option<usize>,
    name: &'static str,
}

impl GbdtClassifier {
    pub fn new(model: GBDT, threshold: f32) -> Self {
        GbdtClassifier {
            model,
            threshold,
            n_features: None,
            name: "gbdt",
        }
    }

    /// Reject rows whose length differs from `n_features`.
    pub fn with_n_features(mut self, n_features: Option<usize>) -> Self {
        self.n_features = n_features;
        self
    }

    /// Load a model saved by gbdt-rs (`GBDT::save_model`).
    pub fn load<P: AsRef<Path>>(path: P, threshold: f32) -> Result<Self> {
        let path = path.as_ref();
        let model = GBDT::load_model(&path.to_string_lossy())
            .map_err(|e| anyhow!("Failed to load gbdt model {}: {}", path.display(), e))?;
        log::info!("Loaded gbdt model from {}", path.display());
        Ok(Self::new(model, threshold))
    }

    /// Load an XGBoost JSON tree dump trained with the `binary:logistic` objective.
    pub fn load_xgboost_dump<P: AsRef<Path>>(path: P, threshold: f32) -> Result<Self> {
        let path = path.as_ref();
        let model = GBDT::from_xgboost_dump(&path.to_string_lossy(), "binary:logistic")
            .map_err(|e| anyhow!("Failed to load xgboost dump {}: {}", path.display(), e))?;
        log::info!("Loaded xgboost dump from {}", path.display());
        Ok(GbdtClassifier {
            name: "xgboost-dump",
            ..Self::new(model, threshold)
        })
    }

    /// Positive-class probability for one row.
    pub fn score(&self, row: &FeatureRow) -> Result<f32, ModelError> {
        if let Some(expected) = self.n_features {
            if row.len() != expected {
                return Err(ModelError::ShapeMismatch {
                    expected,
                    found: row.len(),
                });
            }
        }

        let mut test_x = DataVec::new();
        test_x.push(Data::new_test_data(row.values.clone(), None));
        // gbdt indexes features directly and panics on a short row.
        let predictions = guarded(|| self.model.predict(&test_x))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| ModelError::Backend("gbdt returned no prediction".to_string()))
    }
}

fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, ModelError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ModelError::Backend(format!("gbdt panicked: {}", reason))
    })
}

impl RecurrenceModel for GbdtClassifier {
    fn predict(&self, row: &FeatureRow) -> Result<Label, ModelError> {
        let score = self.score(row)?;
        if !score.is_finite() {
            return Err(ModelError::Backend(format!("gbdt returned score {}", score)));
        }
        Ok(Label::Integer((score >= self.threshold) as i64))
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbdt::config::Config;

    fn train(rows: &[(Vec<f32>, f32)]) -> GBDT {
        let mut config = Config::new();
        config.set_feature_size(rows[0].0.len());
        config.set_shrinkage(0.1);
        config.set_max_depth(3);
        config.set_iterations(50);
        config.set_debug(false);
        config.set_training_optimization_level(2);
        config.set_loss("LogLikelyhood");

        let mut gbdt = GBDT::new(&config);
        let mut train_x = DataVec::new();
        for (features, label) in rows {
            train_x.push(Data::new_training_data(features.clone(), 1.0, *label, None));
        }
        gbdt.fit(&mut train_x);
        gbdt
    }

    fn dataset() -> Vec<(Vec<f32>, f32)> {
        // Recurrence (label 1) whenever the second feature is set.
        (0..20)
            .map(|i| {
                let flag = (i % 2) as f32;
                (vec![i as f32, flag], if flag > 0.0 { 1.0 } else { -1.0 })
            })
            .collect()
    }

    fn row(values: Vec<f32>) -> FeatureRow {
        FeatureRow::new(vec!["Age".into(), "Smoking".into()], values)
    }

    #[test]
    fn test_gbdt_classifier_thresholds_scores() {
        let classifier = GbdtClassifier::new(train(&dataset()), 0.5);

        let positive = classifier.score(&row(vec![3.0, 1.0])).unwrap();
        let negative = classifier.score(&row(vec![4.0, 0.0])).unwrap();
        assert!(positive > negative, "{} <= {}", positive, negative);

        assert_eq!(
            classifier.predict(&row(vec![3.0, 1.0])).unwrap(),
            Label::Integer(1)
        );
        assert_eq!(
            classifier.predict(&row(vec![4.0, 0.0])).unwrap(),
            Label::Integer(0)
        );
    }

    #[test]
    fn test_gbdt_rejects_row_of_wrong_width() {
        let classifier = GbdtClassifier::new(train(&dataset()), 0.5).with_n_features(Some(2));
        let short = FeatureRow::new(vec!["Age".into()], vec![3.0]);

        match classifier.predict(&short) {
            Err(ModelError::ShapeMismatch { expected, found }) => {
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("expected a shape mismatch, got {:?}", other),
        }
        assert!(classifier.predict(&row(vec![3.0, 1.0])).is_ok());
    }

    #[test]
    fn test_backend_panic_becomes_error() {
        let err = guarded(|| -> f32 {
            let features: Vec<f32> = vec![1.0];
            features[17]
        })
        .unwrap_err();
        match err {
            ModelError::Backend(msg) => assert!(msg.contains("gbdt panicked"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(guarded(|| 0.25_f32).unwrap(), 0.25);
    }

    #[test]
    fn test_gbdt_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gbdt");
        let trained = train(&dataset());
        trained.save_model(&path.to_string_lossy()).unwrap();

        let loaded = GbdtClassifier::load(&path, 0.5).unwrap();
        assert_eq!(loaded.name(), "gbdt");
        assert_eq!(
            loaded.predict(&row(vec![5.0, 1.0])).unwrap(),
            Label::Integer(1)
        );
    }

    #[test]
    fn test_gbdt_missing_file_errors() {
        assert!(GbdtClassifier::load("/nonexistent/model.gbdt", 0.5).is_err());
    }
}
