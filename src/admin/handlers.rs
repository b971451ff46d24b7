use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;
use crate::resilience::CircuitBreakerSnapshot;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_circuit_breakers(State(state): State<AppState>) -> Json<Vec<CircuitBreakerSnapshot>> {
    Json(state.breakers.all())
}

pub async fn reset_circuit_breaker(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CircuitBreakerSnapshot>, StatusCode> {
    if !state.breakers.reset(&name) {
        return Err(StatusCode::NOT_FOUND);
    }
    tracing::info!(operation = %name, "Circuit breaker reset via admin API");
    state
        .breakers
        .get(&name)
        .map(|b| Json(b.snapshot()))
        .ok_or(StatusCode::NOT_FOUND)
}
