#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary severity classifier capability.
//!
//! A [`Classifier`] maps feature rows to [`SeverityLabel`]s. The risk
//! scorer only depends on this trait, so any model that can label rows as
//! minor or major can be substituted. [`forest::TreeEnsemble`] is the
//! implementation loaded from the trained model artifact.

pub mod forest;

use accident_risk_accident_models::SeverityLabel;

pub use forest::TreeEnsemble;

/// Errors that can occur while loading a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The model document is not valid JSON or has the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model document parsed but describes an unusable model.
    #[error("Invalid model: {message}")]
    InvalidModel {
        /// Description of what went wrong.
        message: String,
    },
}

/// Trait that all severity classifiers must implement.
///
/// Implementations are immutable after construction and shared across
/// concurrent requests.
pub trait Classifier: Send + Sync {
    /// Names of the feature columns this classifier expects, in the order
    /// each row passed to [`Classifier::predict`] must follow.
    fn feature_names(&self) -> &[String];

    /// Labels each row. Returns exactly one label per input row, in order.
    fn predict(&self, rows: &[&[f64]]) -> Vec<SeverityLabel>;
}
