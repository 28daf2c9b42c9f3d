//! Rutas de la API
//!
//! Este módulo arma el router completo: health check, rutas públicas de
//! autenticación y rutas protegidas por el middleware JWT.

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

pub mod auth_routes;
pub mod booking_routes;
pub mod checkin_routes;
pub mod contract_routes;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    // En producción solo se aceptan los orígenes configurados
    let cors = if state.config.is_production() {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let auth_mw =
        axum::middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", auth_routes::create_auth_router(state.clone()))
        .nest(
            "/api/booking",
            booking_routes::create_booking_router().layer(auth_mw.clone()),
        )
        .nest(
            "/api/checkin",
            checkin_routes::create_checkin_router().layer(auth_mw.clone()),
        )
        .nest(
            "/api/contract",
            contract_routes::create_contract_router().layer(auth_mw),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "ev-rental",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
