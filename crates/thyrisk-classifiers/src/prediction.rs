//! Model labels and their interpretation as a recurrence outcome.
use std::fmt;

use serde::{Deserialize, Serialize};

pub const NO_RECURRENCE_MESSAGE: &str =
    "🟢 Everything looks good! No signs of cancer coming back.";
pub const RECURRENCE_MESSAGE: &str =
    "🔴 There may be a chance of cancer returning. Please consult a doctor for further advice.";

/// Raw label returned by a model. Different artifacts encode the classes
/// differently, so the label is kept as-is until a [`LabelRule`] reads it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Label {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Label::Bool(b) => write!(f, "{}", b),
            Label::Integer(n) => write!(f, "{}", n),
            Label::Float(v) => write!(f, "{}", v),
            Label::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Recurrence,
    NoRecurrence,
}

impl Prediction {
    pub fn message(&self) -> &'static str {
        match self {
            Prediction::Recurrence => RECURRENCE_MESSAGE,
            Prediction::NoRecurrence => NO_RECURRENCE_MESSAGE,
        }
    }

    pub fn is_recurrence(&self) -> bool {
        matches!(self, Prediction::Recurrence)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Recurrence => "recurrence",
            Prediction::NoRecurrence => "no_recurrence",
        }
    }
}

/// How a model label maps to a [`Prediction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRule {
    /// Only the text label `"0"` means no recurrence; anything else,
    /// including the integer `0`, is read as recurrence.
    TextZero,
    /// Cast the label to an integer (floats truncate, text falls back to
    /// `yes`/`1`) and treat `1` as recurrence.
    IntegerCast,
}

impl LabelRule {
    pub fn interpret(&self, label: &Label) -> Prediction {
        match self {
            LabelRule::TextZero => match label {
                Label::Text(s) if s == "0" => Prediction::NoRecurrence,
                Label::Text(_) => Prediction::Recurrence,
                other => {
                    log::warn!(
                        "Model returned non-text label {:?}; only \"0\" reads as no recurrence",
                        other
                    );
                    Prediction::Recurrence
                }
            },
            LabelRule::IntegerCast => {
                if label_as_int(label) == 1 {
                    Prediction::Recurrence
                } else {
                    Prediction::NoRecurrence
                }
            }
        }
    }
}

fn label_as_int(label: &Label) -> i64 {
    match label {
        Label::Integer(n) => *n,
        Label::Bool(b) => *b as i64,
        Label::Float(v) if v.is_finite() => v.trunc() as i64,
        Label::Float(_) => 0,
        Label::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(n) => n,
                Err(_) => match trimmed.to_lowercase().as_str() {
                    "yes" | "1" => 1,
                    _ => 0,
                },
            }
        }
    }
}
