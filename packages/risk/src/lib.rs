#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Nearest-accident risk scoring for route waypoints.
//!
//! For each waypoint the [`scorer::RiskScorer`] finds the ten nearest
//! historical accidents, asks the classifier which of them would have been
//! major, and reports that fraction as the waypoint's risk score.
//! [`context::ServiceState`] holds everything loaded at startup and is the
//! single entry point used by request handlers.

pub mod availability;
pub mod context;
pub mod feed;
pub mod route;
pub mod scorer;

#[cfg(test)]
mod fixtures;

use accident_risk_artifacts::LoadError;
use accident_risk_spatial::SpatialError;

pub use availability::Availability;
pub use context::ServiceState;
pub use feed::AccidentFeed;
pub use scorer::RiskScorer;

/// Errors that can occur while building or querying the risk service.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Caller input is malformed.
    #[error("{message}")]
    Validation {
        /// Human-readable description for the caller.
        message: String,
    },

    /// The data or model this operation needs failed to load at startup.
    #[error("{message}")]
    Unavailable {
        /// Human-readable description for the caller.
        message: String,
    },

    /// The spatial index could not be built.
    #[error("Configuration error: {0}")]
    Configuration(#[from] SpatialError),

    /// An artifact failed to load.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
}

impl RiskError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
