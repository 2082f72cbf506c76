//! HTTP handler functions for the accident-risk API.

use accident_risk_risk::{RiskError, ServiceState};
use accident_risk_server_models::{
    ApiError, ApiHealth, FindSafeRouteRequest, FindSafeRouteResponse,
};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};

/// `GET /api/health`
pub async fn health(state: web::Data<ServiceState>) -> HttpResponse {
    let accidents = state.accidents_ready();
    let route_scoring = state.route_scoring_ready();

    HttpResponse::Ok().json(ApiHealth {
        healthy: accidents && route_scoring,
        version: env!("CARGO_PKG_VERSION").to_string(),
        accidents: accidents.into(),
        route_scoring: route_scoring.into(),
    })
}

/// `GET /api/accidents`
///
/// Returns the accident sample as `[lat, lng, severity]` triples in file
/// order.
pub async fn accidents(state: web::Data<ServiceState>) -> HttpResponse {
    match state.accidents() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/find_safe_route`
///
/// Scores each waypoint by the share of major accidents among its nearest
/// neighbors.
pub async fn find_safe_route(
    state: web::Data<ServiceState>,
    body: web::Json<FindSafeRouteRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    match state.evaluate_route(body.waypoints.as_deref()) {
        Ok(result) => HttpResponse::Ok().json(FindSafeRouteResponse::from(result)),
        Err(e) => error_response(&e),
    }
}

/// Replaces actix's plain-text body error with the API's JSON error shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {err}");
    let response = HttpResponse::BadRequest().json(ApiError::new(format!("Invalid JSON: {err}")));
    InternalError::from_response(err, response).into()
}

fn error_response(err: &RiskError) -> HttpResponse {
    match err {
        RiskError::Validation { .. } => {
            log::debug!("Rejected request: {err}");
            HttpResponse::BadRequest().json(ApiError::new(err.to_string()))
        }
        _ => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().json(ApiError::new(err.to_string()))
        }
    }
}
