use crate::infrastructure::http::controllers as api;
use crate::infrastructure::http::middleware::AppState;
use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/login", post(api::auth::login))
        .route("/api/search", get(api::catalog::search))
        .route("/api/product/:id", get(api::catalog::get_product))
        .route("/api/cart/add", post(api::cart::add_to_cart))
        .route("/api/health", get(api::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the browser frontend. Credentials are allowed, so methods
/// and headers are mirrored rather than wildcarded.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin: HeaderValue = allowed_origin.parse()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
