//! Route evaluation: independent per-waypoint scoring.
//!
//! There are no path semantics here. Waypoints come from an external
//! router and each one is scored on its own.

use accident_risk_accident_models::{RouteScoreResult, Waypoint};

use crate::RiskError;
use crate::scorer::RiskScorer;

/// Fewest waypoints a route may have.
pub const MIN_WAYPOINTS: usize = 2;

/// Validates raw JSON waypoints, each of which must be a `[lat, lng]`
/// pair of finite, in-range numbers.
///
/// # Errors
///
/// Returns [`RiskError::Validation`] if waypoints are missing, fewer than
/// [`MIN_WAYPOINTS`] are given, or any entry is malformed.
pub fn parse_waypoints(raw: Option<&[serde_json::Value]>) -> Result<Vec<Waypoint>, RiskError> {
    let raw = raw.unwrap_or_default();
    check_count(raw.len())?;

    raw.iter()
        .enumerate()
        .map(|(i, value)| parse_waypoint(i, value))
        .collect()
}

fn parse_waypoint(index: usize, value: &serde_json::Value) -> Result<Waypoint, RiskError> {
    let pair = value
        .as_array()
        .filter(|pair| pair.len() == 2)
        .ok_or_else(|| {
            RiskError::validation(format!(
                "Invalid waypoints data: waypoint {index} must be a [lat, lng] pair"
            ))
        })?;

    let (Some(lat), Some(lng)) = (pair[0].as_f64(), pair[1].as_f64()) else {
        return Err(RiskError::validation(format!(
            "Invalid waypoints data: waypoint {index} must contain two numbers"
        )));
    };

    Waypoint::try_new(lat, lng).map_err(|e| {
        RiskError::validation(format!("Invalid waypoints data: waypoint {index}: {e}"))
    })
}

fn check_count(count: usize) -> Result<(), RiskError> {
    if count < MIN_WAYPOINTS {
        return Err(RiskError::validation(format!(
            "Invalid waypoints data: at least {MIN_WAYPOINTS} waypoints are required, got {count}"
        )));
    }
    Ok(())
}

/// Scores every waypoint, preserving input order.
///
/// # Errors
///
/// Returns [`RiskError::Validation`] if fewer than [`MIN_WAYPOINTS`]
/// waypoints are given.
pub fn evaluate(
    scorer: &RiskScorer,
    waypoints: Vec<Waypoint>,
) -> Result<RouteScoreResult, RiskError> {
    check_count(waypoints.len())?;

    let safety_scores = waypoints.iter().map(|w| scorer.score(w)).collect();

    Ok(RouteScoreResult {
        waypoints,
        safety_scores,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::{FlagClassifier, line_table, waypoint};

    fn values(value: &serde_json::Value) -> Vec<serde_json::Value> {
        value.as_array().unwrap().clone()
    }

    #[test]
    fn parses_well_formed_pairs() {
        let raw = values(&json!([[34.05, -118.25], [36, -115]]));
        let waypoints = parse_waypoints(Some(raw.as_slice())).unwrap();
        assert_eq!(waypoints, vec![waypoint(34.05, -118.25), waypoint(36.0, -115.0)]);
    }

    #[test]
    fn rejects_too_few_waypoints() {
        assert!(matches!(
            parse_waypoints(None),
            Err(RiskError::Validation { .. })
        ));
        assert!(matches!(
            parse_waypoints(Some(&[][..])),
            Err(RiskError::Validation { .. })
        ));
        let one = values(&json!([[34.05, -118.25]]));
        assert!(matches!(
            parse_waypoints(Some(one.as_slice())),
            Err(RiskError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_malformed_waypoints() {
        let cases = [
            json!([[34.05, -118.25], [36.12]]),
            json!([[34.05, -118.25], [36.12, -115.17, 0.0]]),
            json!([[34.05, -118.25], ["36.12", -115.17]]),
            json!([[34.05, -118.25], {"lat": 36.12, "lng": -115.17}]),
            json!([[34.05, -118.25], [136.12, -115.17]]),
            json!([[34.05, -118.25], null]),
        ];
        for case in cases {
            let raw = values(&case);
            let err = parse_waypoints(Some(raw.as_slice())).unwrap_err();
            assert!(
                matches!(&err, RiskError::Validation { message } if message.contains("waypoint 1")),
                "unexpected error for {case}: {err}"
            );
        }
    }

    #[test]
    fn evaluate_preserves_length_and_order() {
        // Flag only the far end of the line so scores differ per waypoint.
        let flagged: Vec<usize> = (10..20).collect();
        let scorer =
            RiskScorer::new(line_table(20, &flagged), Box::new(FlagClassifier::default()))
                .unwrap();

        let waypoints = vec![
            waypoint(34.0, 0.0),
            waypoint(34.19, 0.0),
            waypoint(34.0, 0.0),
        ];
        let result = evaluate(&scorer, waypoints.clone()).unwrap();

        assert_eq!(result.waypoints, waypoints);
        assert_eq!(result.safety_scores.len(), 3);
        assert!(result.safety_scores[0].abs() < f64::EPSILON);
        assert!((result.safety_scores[1] - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            result.safety_scores[0].to_bits(),
            result.safety_scores[2].to_bits()
        );
        assert!(
            result
                .safety_scores
                .iter()
                .all(|s| (0.0..=1.0).contains(s))
        );
    }

    #[test]
    fn evaluate_rejects_single_waypoint() {
        let scorer =
            RiskScorer::new(line_table(5, &[]), Box::new(FlagClassifier::default())).unwrap();
        assert!(matches!(
            evaluate(&scorer, vec![waypoint(34.0, 0.0)]),
            Err(RiskError::Validation { .. })
        ));
    }
}
