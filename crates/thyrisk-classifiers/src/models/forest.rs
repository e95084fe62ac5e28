//! Random forest classifier read from exported node arrays.
//!
//! Each tree is stored the way fitted decision trees expose their internals:
//! parallel `children_left` / `children_right` / `feature` / `threshold`
//! arrays plus a per-node `value` row of class weights. A node whose children
//! are `-1` is a leaf. Prediction averages the normalized leaf distributions
//! of all trees and returns the class with the highest mean probability.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assembler::FeatureRow;
use crate::error::ModelError;
use crate::models::classifier_trait::RecurrenceModel;
use crate::prediction::Label;

const LEAF: i64 = -1;

/// On-disk JSON layout of a forest.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ForestArtifact {
    pub classes: Vec<Label>,
    pub n_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class probabilities at this leaf.
    Leaf(Vec<f64>),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_artifact(
        idx: usize,
        tree: &TreeArtifact,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, ModelError> {
        let invalid = |msg: String| ModelError::InvalidArtifact(format!("tree {}: {}", idx, msg));

        let n = tree.children_left.len();
        if n == 0 {
            return Err(invalid("has no nodes".to_string()));
        }
        if [
            tree.children_right.len(),
            tree.feature.len(),
            tree.threshold.len(),
            tree.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(invalid("node arrays have different lengths".to_string()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (tree.children_left[i], tree.children_right[i]);
            if left == LEAF && right == LEAF {
                let weights = &tree.value[i];
                if weights.len() != n_classes {
                    return Err(invalid(format!(
                        "leaf {} has {} class weights, expected {}",
                        i,
                        weights.len(),
                        n_classes
                    )));
                }
                nodes.push(Node::Leaf(normalize(weights)));
                continue;
            }

            // Children always follow their parent, which also rules out cycles.
            let child = |c: i64| -> Result<usize, ModelError> {
                if c <= i as i64 || c >= n as i64 {
                    Err(invalid(format!("node {} has invalid child index {}", i, c)))
                } else {
                    Ok(c as usize)
                }
            };
            let feature = tree.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!(
                    "node {} splits on feature {} but the model has {} features",
                    i, feature, n_features
                )));
            }
            nodes.push(Node::Split {
                feature: feature as usize,
                threshold: tree.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Tree { nodes })
    }

    fn leaf(&self, x: &[f32]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if (x[*feature] as f64) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf(probs) => return probs,
            }
        }
    }
}

fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![0.0; weights.len()]
    }
}

/// Majority-probability forest over a fixed class list.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    classes: Vec<Label>,
    n_features: usize,
    feature_names: Option<Vec<String>>,
    trees: Vec<Tree>,
}

impl ForestClassifier {
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelError> {
        if artifact.classes.is_empty() {
            return Err(ModelError::InvalidArtifact("no classes".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("no trees".to_string()));
        }
        if let Some(names) = &artifact.feature_names {
            if names.len() != artifact.n_features {
                return Err(ModelError::InvalidArtifact(format!(
                    "{} feature names for {} features",
                    names.len(),
                    artifact.n_features
                )));
            }
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| Tree::from_artifact(i, t, artifact.n_features, artifact.classes.len()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForestClassifier {
            classes: artifact.classes,
            n_features: artifact.n_features,
            feature_names: artifact.feature_names,
            trees,
        })
    }

    /// Load a forest from a JSON artifact on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read forest model: {}", path.display()))?;
        let artifact: ForestArtifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse forest model: {}", path.display()))?;
        let forest = Self::from_artifact(artifact)
            .with_context(|| format!("Invalid forest model: {}", path.display()))?;
        log::info!(
            "Loaded forest with {} trees, {} features and {} classes from {}",
            forest.trees.len(),
            forest.n_features,
            forest.classes.len(),
            path.display()
        );
        Ok(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Mean class probabilities across all trees.
    pub fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features,
                found: row.len(),
            });
        }
        if let Some(names) = &self.feature_names {
            if names != &row.columns {
                log::warn!(
                    "Row columns {:?} differ from the columns the forest was trained on {:?}",
                    row.columns,
                    names
                );
            }
        }

        let mut mean = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in mean.iter_mut().zip(tree.leaf(&row.values)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        mean.iter_mut().for_each(|p| *p /= n);
        Ok(mean)
    }
}

impl RecurrenceModel for ForestClassifier {
    fn predict(&self, row: &FeatureRow) -> Result<Label, ModelError> {
        let proba = self.predict_proba(row)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best].clone())
    }

    fn name(&self) -> &str {
        "forest"
    }
}
