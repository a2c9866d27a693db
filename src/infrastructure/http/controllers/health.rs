use crate::{domain::entities::HealthResponse, infrastructure::http::middleware::AppState};
use axum::{extract::State, Json};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.gateway.health())
}
