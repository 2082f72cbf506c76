#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident record, waypoint, and risk label types.
//!
//! This crate defines the plain data types shared by every part of the
//! accident-risk system: historical accident points, caller-supplied route
//! waypoints, the binary severity labels produced by a classifier, and the
//! per-route scoring result.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Integer severity code recorded for a historical accident.
///
/// The sample data uses 1 (least severe) through 4 (most severe), but the
/// code is kept verbatim so other encodings pass through unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Severity(u32);

impl Severity {
    /// Wraps a raw severity code.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw severity code.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single historical accident from the sample table.
///
/// Serializes as a `[lat, lng, severity]` triple, which is the shape the
/// heatmap layer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "(f64, f64, u32)")]
pub struct AccidentRecord {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Recorded severity code.
    pub severity: Severity,
}

impl AccidentRecord {
    /// Creates a record from its coordinates and severity code.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, severity: Severity) -> Self {
        Self {
            latitude,
            longitude,
            severity,
        }
    }
}

impl From<AccidentRecord> for (f64, f64, u32) {
    fn from(record: AccidentRecord) -> Self {
        (record.latitude, record.longitude, record.severity.value())
    }
}

/// A `(latitude, longitude)` pair along a caller-supplied route.
///
/// Serializes as a `[lat, lng]` array. Deserialization goes through
/// [`Waypoint::try_new`], so only well-formed pairs are ever constructed
/// from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Waypoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Waypoint {
    /// Creates a waypoint after checking that both coordinates are finite
    /// and within the valid latitude/longitude ranges.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWaypointError`] if either coordinate is not finite
    /// or is out of range.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, InvalidWaypointError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidWaypointError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidWaypointError::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidWaypointError::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl From<Waypoint> for [f64; 2] {
    fn from(waypoint: Waypoint) -> Self {
        [waypoint.latitude, waypoint.longitude]
    }
}

impl TryFrom<[f64; 2]> for Waypoint {
    type Error = InvalidWaypointError;

    fn try_from([latitude, longitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::try_new(latitude, longitude)
    }
}

/// Reasons a coordinate pair is not a usable [`Waypoint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidWaypointError {
    /// A coordinate was NaN or infinite.
    NotFinite,
    /// Latitude outside `[-90, 90]`.
    LatitudeOutOfRange {
        /// The rejected latitude.
        latitude: f64,
    },
    /// Longitude outside `[-180, 180]`.
    LongitudeOutOfRange {
        /// The rejected longitude.
        longitude: f64,
    },
}

impl std::fmt::Display for InvalidWaypointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFinite => write!(f, "coordinates must be finite numbers"),
            Self::LatitudeOutOfRange { latitude } => {
                write!(f, "latitude {latitude} out of range: expected -90 to 90")
            }
            Self::LongitudeOutOfRange { longitude } => {
                write!(f, "longitude {longitude} out of range: expected -180 to 180")
            }
        }
    }
}

impl std::error::Error for InvalidWaypointError {}

/// Binary classifier output for a historical accident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeverityLabel {
    /// Class 0: predicted minor.
    Minor = 0,
    /// Class 1: predicted major.
    Major = 1,
}

impl SeverityLabel {
    /// Returns the class value (0 or 1).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a label from a class value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not 0 or 1.
    pub const fn from_class(value: u8) -> Result<Self, InvalidLabelError> {
        match value {
            0 => Ok(Self::Minor),
            1 => Ok(Self::Major),
            _ => Err(InvalidLabelError { value }),
        }
    }
}

/// Error returned when a class value is not a binary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLabelError {
    /// The rejected class value.
    pub value: u8,
}

impl std::fmt::Display for InvalidLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid class label {}: expected 0 or 1", self.value)
    }
}

impl std::error::Error for InvalidLabelError {}

/// Display bucket for a risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 0.3
    Low,
    /// Score in `[0.3, 0.6)`
    Moderate,
    /// Score of 0.6 or above
    High,
}

impl RiskLevel {
    /// Upper bound (exclusive) of [`RiskLevel::Low`].
    pub const LOW_BELOW: f64 = 0.3;
    /// Upper bound (exclusive) of [`RiskLevel::Moderate`].
    pub const MODERATE_BELOW: f64 = 0.6;

    /// Buckets a risk score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < Self::LOW_BELOW {
            Self::Low
        } else if score < Self::MODERATE_BELOW {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Per-waypoint risk scores for a route.
///
/// `safety_scores[i]` is the score for `waypoints[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteScoreResult {
    /// The route's waypoints in input order.
    pub waypoints: Vec<Waypoint>,
    /// One score in `[0, 1]` per waypoint.
    pub safety_scores: Vec<f64>,
}

impl RouteScoreResult {
    /// Buckets every score into a [`RiskLevel`], preserving order.
    #[must_use]
    pub fn risk_levels(&self) -> Vec<RiskLevel> {
        self.safety_scores
            .iter()
            .copied()
            .map(RiskLevel::from_score)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accident_record_serializes_as_triple() {
        let record = AccidentRecord::new(34.0, -118.0, Severity::new(2));
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json, serde_json::json!([34.0, -118.0, 2]));

        let wide = AccidentRecord::new(34.0, -118.0, Severity::new(300));
        assert_eq!(
            serde_json::to_value(wide).unwrap(),
            serde_json::json!([34.0, -118.0, 300])
        );
    }

    #[test]
    fn waypoint_rejects_out_of_range() {
        assert!(Waypoint::try_new(34.05, -118.25).is_ok());
        assert_eq!(
            Waypoint::try_new(91.0, 0.0),
            Err(InvalidWaypointError::LatitudeOutOfRange { latitude: 91.0 })
        );
        assert_eq!(
            Waypoint::try_new(0.0, -180.5),
            Err(InvalidWaypointError::LongitudeOutOfRange { longitude: -180.5 })
        );
        assert_eq!(
            Waypoint::try_new(f64::NAN, 0.0),
            Err(InvalidWaypointError::NotFinite)
        );
    }

    #[test]
    fn waypoint_deserializes_from_pair() {
        let waypoint: Waypoint = serde_json::from_str("[36.12, -115.17]").unwrap();
        assert!((waypoint.latitude - 36.12).abs() < f64::EPSILON);
        assert!((waypoint.longitude + 115.17).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Waypoint>("[36.12]").is_err());
        assert!(serde_json::from_str::<Waypoint>("[120.0, 0.0]").is_err());
    }

    #[test]
    fn label_from_class() {
        assert_eq!(SeverityLabel::from_class(0), Ok(SeverityLabel::Minor));
        assert_eq!(SeverityLabel::from_class(1), Ok(SeverityLabel::Major));
        assert!(SeverityLabel::from_class(2).is_err());
        assert_eq!(SeverityLabel::Major.value(), 1);
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.59), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
        assert_eq!(RiskLevel::High.to_string(), "high");
    }
}
