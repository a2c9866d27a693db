use crate::{
    domain::entities::{LoginRequest, LoginResponse},
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{extract::State, Json};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.gateway.login(&request).await?;
    Ok(Json(response))
}
