//! Decision-tree ensemble classifier loaded from a JSON model artifact.
//!
//! The artifact stores each fitted tree as parallel per-node arrays:
//!
//! ```json
//! {
//!   "feature_names": ["Start_Lat", "Start_Lng", "Temperature(F)"],
//!   "classes": [0, 1],
//!   "trees": [{
//!     "children_left":  [1, -1, -1],
//!     "children_right": [2, -1, -1],
//!     "feature":        [0, -2, -2],
//!     "threshold":      [35.0, -2.0, -2.0],
//!     "value":          [[10.0, 6.0], [9.0, 1.0], [1.0, 5.0]]
//!   }]
//! }
//! ```
//!
//! Node `i` is a leaf when `children_left[i] == -1`. Otherwise a row goes
//! left when `row[feature[i]] <= threshold[i]` and right otherwise
//! (including when the value is NaN). `value[i]` holds per-class weights.
//! The ensemble averages each tree's normalized leaf distribution and
//! predicts the class with the highest mean probability.

use std::io::Read;

use accident_risk_accident_models::SeverityLabel;
use serde::Deserialize;

use crate::{Classifier, ClassifierError};

/// Raw model document as stored on disk.
#[derive(Debug, Deserialize)]
struct ModelDocument {
    feature_names: Vec<String>,
    classes: Vec<u8>,
    trees: Vec<TreeDocument>,
}

#[derive(Debug, Deserialize)]
struct TreeDocument {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities, summing to 1 (or all zero for an empty leaf).
        distribution: Vec<f64>,
    },
}

/// A single validated decision tree.
///
/// Child indices are always greater than their parent's index, so
/// traversal from the root always terminates.
#[derive(Debug, Clone, PartialEq)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Ensemble of decision trees voting by averaged class probability.
///
/// A single-tree model is an ensemble of one.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    feature_names: Vec<String>,
    classes: Vec<SeverityLabel>,
    trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    /// Parses and validates a model document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError`] if the JSON is malformed or the model
    /// structure is inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, ClassifierError> {
        let document: ModelDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Parses and validates a model document from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError`] if the JSON is malformed or the model
    /// structure is inconsistent.
    pub fn from_reader(reader: impl Read) -> Result<Self, ClassifierError> {
        let document: ModelDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Number of trees in the ensemble.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Class labels in output order.
    #[must_use]
    pub fn classes(&self) -> &[SeverityLabel] {
        &self.classes
    }

    fn from_document(document: ModelDocument) -> Result<Self, ClassifierError> {
        if document.feature_names.is_empty() {
            return Err(invalid("model declares no feature names"));
        }
        if document.trees.is_empty() {
            return Err(invalid("model contains no trees"));
        }

        let mut classes = Vec::with_capacity(document.classes.len());
        for value in document.classes {
            let label = SeverityLabel::from_class(value)
                .map_err(|e| invalid(format!("unsupported class: {e}")))?;
            if classes.contains(&label) {
                return Err(invalid(format!("duplicate class {value}")));
            }
            classes.push(label);
        }
        if classes.is_empty() {
            return Err(invalid("model declares no classes"));
        }

        let n_features = document.feature_names.len();
        let trees = document
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                build_tree(tree, n_features, classes.len())
                    .map_err(|message| invalid(format!("tree {i}: {message}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Loaded tree ensemble: {} trees, {} features, {} classes",
            trees.len(),
            n_features,
            classes.len()
        );

        Ok(Self {
            feature_names: document.feature_names,
            classes,
            trees,
        })
    }

    fn predict_row(&self, row: &[f64]) -> SeverityLabel {
        let mut totals = vec![0.0_f64; self.classes.len()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.leaf_distribution(row)) {
                *total += p;
            }
        }

        // First maximum wins, so ties go to the lowest class index.
        let mut best = 0;
        for (i, total) in totals.iter().enumerate().skip(1) {
            if *total > totals[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

impl Classifier for TreeEnsemble {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[&[f64]]) -> Vec<SeverityLabel> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

fn invalid(message: impl Into<String>) -> ClassifierError {
    ClassifierError::InvalidModel {
        message: message.into(),
    }
}

fn build_tree(
    tree: TreeDocument,
    n_features: usize,
    n_classes: usize,
) -> Result<DecisionTree, String> {
    let n = tree.children_left.len();
    if n == 0 {
        return Err("tree has no nodes".to_string());
    }
    if tree.children_right.len() != n
        || tree.feature.len() != n
        || tree.threshold.len() != n
        || tree.value.len() != n
    {
        return Err(format!(
            "per-node arrays differ in length (children_left={n}, children_right={}, \
             feature={}, threshold={}, value={})",
            tree.children_right.len(),
            tree.feature.len(),
            tree.threshold.len(),
            tree.value.len()
        ));
    }

    let child_index = |parent: usize, child: i64| -> Result<usize, String> {
        usize::try_from(child)
            .ok()
            .filter(|&c| c > parent && c < n)
            .ok_or_else(|| format!("node {parent} has invalid child index {child}"))
    };

    let mut nodes = Vec::with_capacity(n);
    for (i, weights) in tree.value.into_iter().enumerate() {
        let left = tree.children_left[i];
        let right = tree.children_right[i];

        if left == -1 {
            if right != -1 {
                return Err(format!("leaf node {i} has a right child"));
            }
            nodes.push(Node::Leaf {
                distribution: normalize(i, weights, n_classes)?,
            });
            continue;
        }

        let feature = usize::try_from(tree.feature[i])
            .ok()
            .filter(|&f| f < n_features)
            .ok_or_else(|| format!("node {i} splits on invalid feature {}", tree.feature[i]))?;
        let threshold = tree.threshold[i];
        if !threshold.is_finite() {
            return Err(format!("node {i} has a non-finite threshold"));
        }

        nodes.push(Node::Split {
            feature,
            threshold,
            left: child_index(i, left)?,
            right: child_index(i, right)?,
        });
    }

    Ok(DecisionTree { nodes })
}

fn normalize(node: usize, weights: Vec<f64>, n_classes: usize) -> Result<Vec<f64>, String> {
    if weights.len() != n_classes {
        return Err(format!(
            "leaf node {node} has {} class weights, expected {n_classes}",
            weights.len()
        ));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(format!("leaf node {node} has a negative or non-finite weight"));
    }

    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        Ok(weights.into_iter().map(|w| w / sum).collect())
    } else {
        Ok(weights)
    }
}
