//! Feature vector assembly.
//!
//! Encoded fields are emitted in [`FEATURE_NAMES`] order. When a persisted
//! list of training-time columns is available, the row can additionally be
//! reindexed against it: unknown columns are dropped and absent ones filled
//! with zero.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::encoding::{EncodeOutcome, EncodingTable};
use crate::schema::FEATURE_NAMES;

/// Raw form submission keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    fields: HashMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for FormInput {
    fn from(fields: HashMap<String, String>) -> Self {
        FormInput { fields }
    }
}

/// Collects submitted pairs; when a name repeats, the first value wins.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = HashMap::new();
        for (k, v) in iter {
            fields.entry(k.into()).or_insert_with(|| v.into());
        }
        FormInput { fields }
    }
}

/// One named, ordered row of model input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub columns: Vec<String>,
    pub values: Vec<f32>,
}

impl FeatureRow {
    pub fn new(columns: Vec<String>, values: Vec<f32>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "FeatureRow columns and values must have equal length"
        );
        FeatureRow { columns, values }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|idx| self.values[idx])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A field that fell back to zero while encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefault {
    pub field: String,
    pub outcome: EncodeOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRow {
    pub row: FeatureRow,
    pub defaults: Vec<FieldDefault>,
}

/// Encode every feature of `form` in training order.
pub fn assemble(table: &EncodingTable, form: &FormInput) -> AssembledRow {
    let mut values = Vec::with_capacity(FEATURE_NAMES.len());
    let mut defaults = Vec::new();

    for name in FEATURE_NAMES {
        let encoded = table.encode(name, form.get(name));
        if encoded.outcome.is_default() {
            defaults.push(FieldDefault {
                field: name.to_string(),
                outcome: encoded.outcome,
            });
        }
        values.push(encoded.value);
    }

    AssembledRow {
        row: FeatureRow::new(FEATURE_NAMES.iter().map(|s| s.to_string()).collect(), values),
        defaults,
    }
}

/// Reorder `row` to match `training_columns`, filling absent columns with 0
/// and dropping columns the model never saw.
pub fn reindex(row: &FeatureRow, training_columns: &[String]) -> FeatureRow {
    let values = training_columns
        .iter()
        .map(|column| match row.get(column) {
            Some(v) => v,
            None => {
                log::debug!("Training column '{}' absent from input, filled with 0", column);
                0.0
            }
        })
        .collect();

    for column in &row.columns {
        if !training_columns.contains(column) {
            log::debug!("Input column '{}' unknown to the model, dropped", column);
        }
    }

    FeatureRow::new(training_columns.to_vec(), values)
}

/// Column order persisted alongside a model at training time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingColumns(Vec<String>);

impl TrainingColumns {
    pub fn new(columns: Vec<String>) -> Self {
        TrainingColumns(columns)
    }

    /// Load from a JSON array of strings (`.json`) or from the header row of
    /// a CSV/TSV file (any other extension; `.tsv` is tab-delimited).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        let columns: Vec<String> = match ext.as_deref() {
            Some("json") => {
                let content = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read training columns: {}", path.display())
                })?;
                serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse training columns: {}", path.display())
                })?
            }
            other => {
                let delimiter = if other == Some("tsv") { b'\t' } else { b',' };
                let mut reader = csv::ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(true)
                    .from_path(path)
                    .with_context(|| {
                        format!("Failed to open training columns: {}", path.display())
                    })?;
                reader
                    .headers()
                    .context("Failed to read training column header row")?
                    .iter()
                    .map(|s| s.trim().to_string())
                    .collect()
            }
        };

        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            bail!("Training column list is empty: {}", path.display());
        }

        Ok(TrainingColumns(columns))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
