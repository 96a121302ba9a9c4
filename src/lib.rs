//! HouseHunt Backend
//!
//! REST backend for property listings with hosted media, plus shortlists
//! shared with clients through unguessable tokens.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod media;
pub mod models;
pub mod shortlist;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use catalog::Catalog;
use config::Config;
use db::Repository;
use media::{MediaHost, MAX_VIDEO_BYTES};
use shortlist::ShortlistService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub shortlists: ShortlistService,
    pub media: Arc<dyn MediaHost>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, media: Arc<dyn MediaHost>, config: Config) -> Self {
        Self {
            catalog: Catalog::new(repo.clone(), media.clone()),
            shortlists: ShortlistService::new(repo),
            media,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Admin API routes
    let api_routes = Router::new()
        // Properties
        .route(
            "/properties",
            get(api::list_properties).post(api::create_property),
        )
        .route("/properties/bulk-delete", post(api::bulk_delete_properties))
        .route(
            "/properties/{id}",
            get(api::get_property)
                .put(api::update_property)
                .delete(api::delete_property),
        )
        .route(
            "/properties/{id}/availability",
            post(api::toggle_availability),
        )
        // Media
        .route(
            "/media",
            post(api::upload_media).layer(DefaultBodyLimit::max(MAX_VIDEO_BYTES + 1024 * 1024)),
        )
        // Shortlists
        .route(
            "/shortlists",
            get(api::list_shortlists).post(api::create_shortlist),
        )
        .route("/shortlists/{id}", delete(api::deactivate_shortlist))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Token-addressed routes for anonymous shortlist holders
    let public_routes =
        Router::new().route("/shortlists/{token}", get(api::get_public_shortlist));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .nest("/public", public_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
