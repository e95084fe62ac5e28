//! Feature list and encoding variants.
//!
//! The feature order below is the column order the classifier was trained on.
//! It must not be reordered, and the misspelled `Hx Radiothreapy` column name
//! is part of that training schema.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::prediction::LabelRule;

/// Model input columns in training order.
pub const FEATURE_NAMES: [&str; 16] = [
    "Age",
    "Gender",
    "Smoking",
    "Hx Smoking",
    "Hx Radiothreapy",
    "Thyroid Function",
    "Physical Examination",
    "Adenopathy",
    "Pathology",
    "Focality",
    "Risk",
    "T",
    "N",
    "M",
    "Stage",
    "Response",
];

/// How a raw form value is normalized before the table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRule {
    /// Trim surrounding whitespace and lower-case.
    Lowercase,
    /// Trim surrounding whitespace, then match case-sensitively.
    Exact,
}

impl CaseRule {
    pub fn normalize<'a>(&self, raw: &'a str) -> std::borrow::Cow<'a, str> {
        let trimmed = raw.trim();
        match self {
            CaseRule::Lowercase => std::borrow::Cow::Owned(trimmed.to_lowercase()),
            CaseRule::Exact => std::borrow::Cow::Borrowed(trimmed),
        }
    }
}

/// The two deployed encodings.
///
/// `Lowercase` accepts short lower-case labels (`male`, `t2`, `stage ii`) and
/// expects the model to return the string label `"0"` for no recurrence.
/// `Dataset` accepts the raw vocabulary of the training dataset (`M`, `T2`,
/// `II`), label-encoded in sorted order, and may reindex the row against a
/// persisted training column list.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    Lowercase,
    Dataset,
}

impl Variant {
    pub fn case_rule(&self) -> CaseRule {
        match self {
            Variant::Lowercase => CaseRule::Lowercase,
            Variant::Dataset => CaseRule::Exact,
        }
    }

    pub fn label_rule(&self) -> LabelRule {
        match self {
            Variant::Lowercase => LabelRule::TextZero,
            Variant::Dataset => LabelRule::IntegerCast,
        }
    }

    /// Whether rows are reindexed against persisted training columns.
    pub fn supports_reindex(&self) -> bool {
        matches!(self, Variant::Dataset)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Lowercase => "lowercase",
            Variant::Dataset => "dataset",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lowercase" | "a" | "variant-a" => Ok(Variant::Lowercase),
            "dataset" | "b" | "variant-b" => Ok(Variant::Dataset),
            _ => Err(SchemaError::UnknownVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_order_is_fixed() {
        assert_eq!(FEATURE_NAMES.len(), 16);
        assert_eq!(FEATURE_NAMES[0], "Age");
        assert_eq!(FEATURE_NAMES[4], "Hx Radiothreapy");
        assert_eq!(FEATURE_NAMES[15], "Response");
    }

    #[test]
    fn variant_parses_aliases() {
        assert_eq!("Lowercase".parse::<Variant>().unwrap(), Variant::Lowercase);
        assert_eq!("a".parse::<Variant>().unwrap(), Variant::Lowercase);
        assert_eq!("variant-b".parse::<Variant>().unwrap(), Variant::Dataset);
        assert_eq!(" DATASET ".parse::<Variant>().unwrap(), Variant::Dataset);
        assert!(matches!(
            "c".parse::<Variant>(),
            Err(SchemaError::UnknownVariant(_))
        ));
    }

    #[test]
    fn variant_serde_is_kebab_case() {
        let json = serde_json::to_string(&Variant::Dataset).unwrap();
        assert_eq!(json, "\"dataset\"");
        let v: Variant = serde_json::from_str("\"lowercase\"").unwrap();
        assert_eq!(v, Variant::Lowercase);
    }

    #[test]
    fn case_rules_normalize() {
        assert_eq!(CaseRule::Lowercase.normalize("  Stage II "), "stage ii");
        assert_eq!(CaseRule::Exact.normalize("  Stage II "), "Stage II");
    }
}
