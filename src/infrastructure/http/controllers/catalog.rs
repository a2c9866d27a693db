use crate::{
    domain::entities::SearchParams,
    infrastructure::http::middleware::{ApiResult, AppState, SessionId},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

/// Relay a product search; the retailer's body is returned as-is.
pub async fn search(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Value>> {
    let results = state.gateway.search(session.as_deref(), &params).await?;
    Ok(Json(results))
}

pub async fn get_product(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state
        .gateway
        .get_product(session.as_deref(), &product_id)
        .await?;
    Ok(Json(product))
}
