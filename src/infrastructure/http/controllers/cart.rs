use crate::{
    domain::entities::AddToCartRequest,
    infrastructure::http::middleware::{ApiResult, AppState, SessionId},
};
use axum::{extract::State, Json};
use serde_json::Value;

pub async fn add_to_cart(
    State(state): State<AppState>,
    session: SessionId,
    Json(request): Json<AddToCartRequest>,
) -> ApiResult<Json<Value>> {
    let cart = state
        .gateway
        .add_to_cart(session.as_deref(), &request)
        .await?;
    Ok(Json(cart))
}
