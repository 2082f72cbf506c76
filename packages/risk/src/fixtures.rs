//! Shared test fixtures: a substitute classifier and small feature tables.

use accident_risk_accident_models::{SeverityLabel, Waypoint};
use accident_risk_artifacts::FeatureTable;
use accident_risk_classifier::Classifier;

/// Labels a row major when its third value (the `flag` column) is set.
pub struct FlagClassifier {
    pub names: Vec<String>,
}

impl Default for FlagClassifier {
    fn default() -> Self {
        Self {
            names: vec![
                "Start_Lat".to_string(),
                "Start_Lng".to_string(),
                "flag".to_string(),
            ],
        }
    }
}

impl Classifier for FlagClassifier {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, rows: &[&[f64]]) -> Vec<SeverityLabel> {
        rows.iter()
            .map(|row| {
                if row.get(2).copied().unwrap_or(0.0) > 0.5 {
                    SeverityLabel::Major
                } else {
                    SeverityLabel::Minor
                }
            })
            .collect()
    }
}

/// `count` accidents north of `(34.0, 0.0)` spaced 0.01 degrees apart, so
/// row `i` is the `i`-th nearest to that point. Rows in `flagged` carry
/// `flag = 1`.
pub fn line_table(count: usize, flagged: &[usize]) -> FeatureTable {
    let mut coordinates = Vec::with_capacity(count);
    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let lat = (i as f64).mul_add(0.01, 34.0);
        let flag = if flagged.contains(&i) { 1.0 } else { 0.0 };
        coordinates.push((lat, 0.0));
        rows.push(vec![lat, 0.0, flag]);
    }
    FeatureTable::from_parts(FlagClassifier::default().names, coordinates, rows).unwrap()
}

pub fn waypoint(lat: f64, lng: f64) -> Waypoint {
    Waypoint::try_new(lat, lng).unwrap()
}
