//! Admin endpoints for breaker inspection and reset.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/circuit-breakers", get(get_circuit_breakers))
        .route("/admin/circuit-breakers/{name}/reset", post(reset_circuit_breaker))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
