//! Per-point risk scoring.

use accident_risk_accident_models::{SeverityLabel, Waypoint};
use accident_risk_artifacts::{FeatureTable, LoadError};
use accident_risk_classifier::Classifier;
use accident_risk_spatial::{DEFAULT_NEIGHBORS, SpatialIndex};

use crate::RiskError;

/// Scores a point by the fraction of its nearest historical accidents that
/// the classifier labels major.
///
/// Holds the feature table, the spatial index built over that table's
/// coordinates, and the classifier. All three are immutable, so one scorer
/// serves every request concurrently.
pub struct RiskScorer {
    table: FeatureTable,
    index: SpatialIndex,
    classifier: Box<dyn Classifier>,
    neighbors: usize,
}

impl std::fmt::Debug for RiskScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskScorer")
            .field("rows", &self.table.len())
            .field("features", &self.table.feature_names())
            .field("neighbors", &self.neighbors)
            .finish_non_exhaustive()
    }
}

impl RiskScorer {
    /// Builds the spatial index over `table` and pairs it with
    /// `classifier`.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Load`] if the table's feature columns differ
    /// from the classifier's, or [`RiskError::Configuration`] if the index
    /// cannot be built.
    pub fn new(table: FeatureTable, classifier: Box<dyn Classifier>) -> Result<Self, RiskError> {
        if table.feature_names() != classifier.feature_names() {
            return Err(LoadError::Inconsistent {
                message: format!(
                    "feature table columns {:?} do not match classifier features {:?}",
                    table.feature_names(),
                    classifier.feature_names()
                ),
            }
            .into());
        }

        let index = SpatialIndex::build(table.coordinates())?;

        Ok(Self {
            table,
            index,
            classifier,
            neighbors: DEFAULT_NEIGHBORS,
        })
    }

    /// Overrides how many neighbors are consulted per point.
    #[must_use]
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    #[must_use]
    pub const fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Number of historical accidents available for lookup.
    #[must_use]
    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }

    /// Risk score in `[0, 1]` for a single point.
    ///
    /// Pure for a given scorer: the same point always yields the same
    /// score. Returns 0 if no neighbors are found.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self, waypoint: &Waypoint) -> f64 {
        let indices = self
            .index
            .query(waypoint.latitude, waypoint.longitude, self.neighbors);

        let rows: Vec<&[f64]> = indices.iter().filter_map(|&i| self.table.row(i)).collect();
        if rows.is_empty() {
            return 0.0;
        }

        let labels = self.classifier.predict(&rows);
        if labels.is_empty() {
            return 0.0;
        }

        let major = labels
            .iter()
            .filter(|label| **label == SeverityLabel::Major)
            .count();

        major as f64 / labels.len() as f64
    }
}
