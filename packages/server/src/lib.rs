#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the accident-risk map.
//!
//! Serves the accident sample for the heatmap layer, scores route
//! waypoints against the nearest historical accidents, and optionally
//! serves the built frontend. All artifacts are loaded once before the
//! server binds; anything that fails to load is reported as unavailable by
//! the endpoints that need it.

pub mod config;
mod handlers;

use accident_risk_risk::ServiceState;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

pub use config::{ConfigError, ServerConfig};

/// Registers the `/api` routes and the JSON body error handler.
///
/// Expects a `web::Data<ServiceState>` to be registered on the app.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/accidents", web::get().to(handlers::accidents))
                .route(
                    "/find_safe_route",
                    web::post().to(handlers::find_safe_route),
                ),
        );
}

/// Loads every artifact named by `config` and runs the HTTP server until
/// shutdown.
///
/// # Errors
///
/// Returns an error if the server fails to bind or encounters a fatal I/O
/// error. Artifact load failures are not errors; they put the affected
/// endpoints into an unavailable state.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(ServiceState::load(&config.artifact_paths()));

    let static_dir = config.static_dir.filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            log::warn!(
                "Static directory {} not found; frontend will not be served",
                dir.display()
            );
        }
        exists
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api);

        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
