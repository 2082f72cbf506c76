#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the accident-risk server.
//!
//! These types are serialized to JSON for the REST API. Field names on the
//! route endpoints are snake_case because the map frontend already reads
//! `safety_scores`; the health endpoint follows the camelCase convention.

use accident_risk_accident_models::{RiskLevel, RouteScoreResult, Waypoint};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/find_safe_route`.
///
/// Waypoints are kept as raw JSON so each malformed entry can be reported
/// by index rather than rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindSafeRouteRequest {
    /// `[[lat, lng], ...]`
    #[serde(default)]
    pub waypoints: Option<Vec<serde_json::Value>>,
}

/// Response from `POST /api/find_safe_route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindSafeRouteResponse {
    /// The validated waypoints, in request order.
    pub waypoints: Vec<Waypoint>,
    /// One risk score in `[0, 1]` per waypoint.
    pub safety_scores: Vec<f64>,
    /// Display bucket for each score.
    pub risk_levels: Vec<RiskLevel>,
}

impl From<RouteScoreResult> for FindSafeRouteResponse {
    fn from(result: RouteScoreResult) -> Self {
        let risk_levels = result.risk_levels();
        Self {
            waypoints: result.waypoints,
            safety_scores: result.safety_scores,
            risk_levels,
        }
    }
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Load state of one startup-loaded component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ready,
    Unavailable,
}

impl From<bool> for ComponentStatus {
    fn from(ready: bool) -> Self {
        if ready { Self::Ready } else { Self::Unavailable }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether every component loaded.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Accident sample feeding `GET /api/accidents`.
    pub accidents: ComponentStatus,
    /// Classifier and feature table feeding `POST /api/find_safe_route`.
    pub route_scoring: ComponentStatus,
}
