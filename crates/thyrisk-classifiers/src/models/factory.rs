use anyhow::Result;

use crate::config::{ModelConfig, ModelKind};
use crate::models::classifier_trait::RecurrenceModel;
use crate::models::forest::ForestClassifier;
use crate::models::gbdt::GbdtClassifier;

/// Load a boxed classifier model from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn load_model(config: &ModelConfig) -> Result<Box<dyn RecurrenceModel>> {
    match config.kind {
        ModelKind::Forest => Ok(Box::new(ForestClassifier::load(&config.path)?)),
        ModelKind::Gbdt => Ok(Box::new(
            GbdtClassifier::load(&config.path, config.threshold)?
                .with_n_features(config.n_features),
        )),
        ModelKind::XgboostDump => Ok(Box::new(
            GbdtClassifier::load_xgboost_dump(&config.path, config.threshold)?
                .with_n_features(config.n_features),
        )),
    }
}
