//! Process-wide state loaded once at startup.
//!
//! [`ServiceState`] is constructed before the server starts accepting
//! requests and is shared read-only by every handler. Each operation checks
//! the availability of exactly the resources it depends on, so a missing
//! accident sample does not take route scoring down with it (or vice versa).

use accident_risk_accident_models::{AccidentRecord, RouteScoreResult};
use accident_risk_artifacts::{self as artifacts, ArtifactPaths};
use accident_risk_classifier::Classifier as _;

use crate::RiskError;
use crate::availability::Availability;
use crate::feed::AccidentFeed;
use crate::route;
use crate::scorer::RiskScorer;

/// Name reported when the accident sample is unavailable.
pub const ACCIDENT_DATA: &str = "Accident data";
/// Name reported when route scoring is unavailable.
pub const ROUTE_MODEL: &str = "Model or data";

/// Everything the request handlers need, immutable after construction.
#[derive(Debug)]
pub struct ServiceState {
    accidents: Availability<AccidentFeed>,
    scorer: Availability<RiskScorer>,
}

impl ServiceState {
    #[must_use]
    pub const fn new(
        accidents: Availability<AccidentFeed>,
        scorer: Availability<RiskScorer>,
    ) -> Self {
        Self { accidents, scorer }
    }

    /// Loads every artifact from `paths`. Never fails: a resource that
    /// cannot be loaded is logged once and marked unavailable.
    #[must_use]
    pub fn load(paths: &ArtifactPaths) -> Self {
        let accidents = Availability::from_load(
            ACCIDENT_DATA,
            artifacts::load_accidents(&paths.accidents).map(AccidentFeed::new),
        );
        let scorer = Availability::from_load(ROUTE_MODEL, load_scorer(paths));

        if accidents.is_ready() && scorer.is_ready() {
            log::info!("All artifacts loaded successfully");
        } else {
            log::warn!("Serving in degraded mode; some endpoints will report unavailable");
        }

        Self::new(accidents, scorer)
    }

    /// The accident sample in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Unavailable`] if the sample failed to load.
    pub fn accidents(&self) -> Result<&[AccidentRecord], RiskError> {
        Ok(self.accidents.get()?.get_all())
    }

    /// Validates raw JSON waypoints and scores each one.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Unavailable`] if the model or feature table
    /// failed to load, checked before any input validation, and
    /// [`RiskError::Validation`] if the waypoints are missing or malformed.
    pub fn evaluate_route(
        &self,
        raw: Option<&[serde_json::Value]>,
    ) -> Result<RouteScoreResult, RiskError> {
        let scorer = self.scorer.get()?;
        let waypoints = route::parse_waypoints(raw)?;
        route::evaluate(scorer, waypoints)
    }

    #[must_use]
    pub const fn accidents_ready(&self) -> bool {
        self.accidents.is_ready()
    }

    #[must_use]
    pub const fn route_scoring_ready(&self) -> bool {
        self.scorer.is_ready()
    }
}

fn load_scorer(paths: &ArtifactPaths) -> Result<RiskScorer, RiskError> {
    let classifier = artifacts::load_classifier(&paths.model)?;
    let table = artifacts::load_feature_table(&paths.features, classifier.feature_names())?;
    let scorer = RiskScorer::new(table, Box::new(classifier))?;
    log::info!(
        "Route scoring ready over {} accident locations ({} neighbors per waypoint)",
        scorer.indexed_len(),
        scorer.neighbors()
    );
    Ok(scorer)
}
