//! Per-field string-to-integer encoding tables.
//!
//! Every field listed in a table is categorical; any other feature is parsed
//! as a float. Unknown, missing and unparsable values fall back to `0.0`
//! rather than failing the request. Each fallback is reported through
//! [`EncodeOutcome`] and logged so it never goes unnoticed.
use std::collections::HashMap;

use crate::schema::{CaseRule, Variant};

type Labels = &'static [(&'static str, i64)];

const YES_NO: Labels = &[("yes", 1), ("no", 0)];

const LOWERCASE_TABLE: &[(&str, Labels)] = &[
    ("Gender", &[("male", 1), ("female", 0)]),
    ("Smoking", YES_NO),
    ("Hx Smoking", YES_NO),
    ("Hx Radiothreapy", YES_NO),
    (
        "Thyroid Function",
        &[("normal", 0), ("hyper", 1), ("hypo", 2)],
    ),
    ("Physical Examination", &[("normal", 0), ("abnormal", 1)]),
    ("Adenopathy", YES_NO),
    ("Pathology", &[("benign", 0), ("malignant", 1)]),
    ("Focality", &[("unifocal", 0), ("multifocal", 1)]),
    ("Risk", &[("low", 0), ("intermediate", 1), ("high", 2)]),
    (
        "Response",
        &[
            ("excellent", 0),
            ("indeterminate", 1),
            ("biochemical incomplete", 2),
            ("structural incomplete", 3),
        ],
    ),
    (
        "T",
        &[("t0", 0), ("t1", 1), ("t2", 2), ("t3", 3), ("t4", 4)],
    ),
    ("N", &[("n0", 0), ("n1", 1), ("n2", 2), ("n3", 3)]),
    ("M", &[("m0", 0), ("m1", 1)]),
    (
        "Stage",
        &[
            ("stage i", 0),
            ("stage ii", 1),
            ("stage iii", 2),
            ("stage iv", 3),
            ("i", 0),
            ("ii", 1),
            ("iii", 2),
            ("iv", 3),
        ],
    ),
];

// Codes follow label-encoder order: labels sorted, numbered from zero.
const DATASET_NO_YES: Labels = &[("No", 0), ("Yes", 1)];

const DATASET_TABLE: &[(&str, Labels)] = &[
    ("Gender", &[("F", 0), ("M", 1)]),
    ("Smoking", DATASET_NO_YES),
    ("Hx Smoking", DATASET_NO_YES),
    ("Hx Radiothreapy", DATASET_NO_YES),
    (
        "Thyroid Function",
        &[
            ("Clinical Hyperthyroidism", 0),
            ("Clinical Hypothyroidism", 1),
            ("Euthyroid", 2),
            ("Subclinical Hyperthyroidism", 3),
            ("Subclinical Hypothyroidism", 4),
        ],
    ),
    (
        "Physical Examination",
        &[
            ("Diffuse goiter", 0),
            ("Multinodular goiter", 1),
            ("Normal", 2),
            ("Single nodular goiter-left", 3),
            ("Single nodular goiter-right", 4),
        ],
    ),
    (
        "Adenopathy",
        &[
            ("Bilateral", 0),
            ("Extensive", 1),
            ("Left", 2),
            ("No", 3),
            ("Posterior", 4),
            ("Right", 5),
        ],
    ),
    (
        "Pathology",
        &[
            ("Follicular", 0),
            ("Hurthel cell", 1),
            ("Micropapillary", 2),
            ("Papillary", 3),
        ],
    ),
    ("Focality", &[("Multi-Focal", 0), ("Uni-Focal", 1)]),
    ("Risk", &[("High", 0), ("Intermediate", 1), ("Low", 2)]),
    (
        "T",
        &[
            ("T1a", 0),
            ("T1b", 1),
            ("T2", 2),
            ("T3a", 3),
            ("T3b", 4),
            ("T4a", 5),
            ("T4b", 6),
        ],
    ),
    ("N", &[("N0", 0), ("N1a", 1), ("N1b", 2)]),
    ("M", &[("M0", 0), ("M1", 1)]),
    (
        "Stage",
        &[("I", 0), ("II", 1), ("III", 2), ("IVA", 3), ("IVB", 4)],
    ),
    (
        "Response",
        &[
            ("Biochemical Incomplete", 0),
            ("Excellent", 1),
            ("Indeterminate", 2),
            ("Structural Incomplete", 3),
        ],
    ),
];

/// How a single field is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEncoding {
    Categorical(Labels),
    Numeric,
}

/// Why a value was encoded the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// Categorical label found in the table.
    Matched,
    /// Numeric field parsed successfully.
    Numeric,
    /// Field absent or blank; defaulted to 0.
    Missing,
    /// Categorical label not in the table; defaulted to 0.
    Unrecognized,
    /// Numeric field could not be parsed; defaulted to 0.
    InvalidNumeric,
}

impl EncodeOutcome {
    pub fn is_default(&self) -> bool {
        !matches!(self, EncodeOutcome::Matched | EncodeOutcome::Numeric)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EncodeOutcome::Matched => "matched",
            EncodeOutcome::Numeric => "numeric",
            EncodeOutcome::Missing => "missing",
            EncodeOutcome::Unrecognized => "unrecognized",
            EncodeOutcome::InvalidNumeric => "invalid numeric",
        }
    }
}

/// An encoded field value together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoded {
    pub value: f32,
    pub outcome: EncodeOutcome,
}

impl Encoded {
    fn fallback(outcome: EncodeOutcome) -> Self {
        Encoded {
            value: 0.0,
            outcome,
        }
    }
}

/// Lookup tables for one variant.
#[derive(Debug, Clone)]
pub struct EncodingTable {
    case_rule: CaseRule,
    fields: HashMap<&'static str, Labels>,
}

impl EncodingTable {
    pub fn for_variant(variant: Variant) -> Self {
        let source = match variant {
            Variant::Lowercase => LOWERCASE_TABLE,
            Variant::Dataset => DATASET_TABLE,
        };
        EncodingTable {
            case_rule: variant.case_rule(),
            fields: source.iter().copied().collect(),
        }
    }

    pub fn case_rule(&self) -> CaseRule {
        self.case_rule
    }

    pub fn field(&self, name: &str) -> FieldEncoding {
        match self.fields.get(name) {
            Some(labels) => FieldEncoding::Categorical(*labels),
            None => FieldEncoding::Numeric,
        }
    }

    /// Accepted labels for a categorical field, in table order.
    pub fn labels(&self, name: &str) -> Vec<&'static str> {
        match self.field(name) {
            FieldEncoding::Categorical(labels) => labels.iter().map(|(label, _)| *label).collect(),
            FieldEncoding::Numeric => Vec::new(),
        }
    }

    /// Encode one raw form value. Never fails: fallbacks are logged and
    /// reported through the returned outcome.
    pub fn encode(&self, name: &str, raw: Option<&str>) -> Encoded {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                log::warn!("Field '{}' is missing, defaulting to 0", name);
                return Encoded::fallback(EncodeOutcome::Missing);
            }
        };

        match self.field(name) {
            FieldEncoding::Categorical(labels) => {
                let key = self.case_rule.normalize(raw);
                match labels.iter().find(|(label, _)| *label == &*key) {
                    Some((_, code)) => Encoded {
                        value: *code as f32,
                        outcome: EncodeOutcome::Matched,
                    },
                    None => {
                        log::warn!(
                            "Field '{}' has unrecognized value {:?}, defaulting to 0",
                            name,
                            raw
                        );
                        Encoded::fallback(EncodeOutcome::Unrecognized)
                    }
                }
            }
            FieldEncoding::Numeric => match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => Encoded {
                    value: v,
                    outcome: EncodeOutcome::Numeric,
                },
                _ => {
                    log::warn!(
                        "Field '{}' has invalid numeric value {:?}, defaulting to 0",
                        name,
                        raw
                    );
                    Encoded::fallback(EncodeOutcome::InvalidNumeric)
                }
            },
        }
    }
}
