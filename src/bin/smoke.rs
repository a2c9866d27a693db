//! Drives the retailer API directly with the configured account: login,
//! search, product lookup and a single add-to-cart.

use anyhow::Context;
use basket_relay::config::Config;
use basket_relay::domain::entities::StoreProductId;
use basket_relay::domain::ports::retailer_client::RetailerClient;
use basket_relay::infrastructure::providers::HttpRetailerClient;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_QUERY: &str = "whole milk";
const SAMPLE_PRODUCT_ID: &str = "2142896100";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "basket_relay=info,smoke=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let (email, password) = config.upstream_credentials()?;

    let client = HttpRetailerClient::new(&config.upstream)?;
    client.login(email, password).await.context("login")?;

    let results = client
        .search_products(SAMPLE_QUERY, 8, "pickup")
        .await
        .context("search")?;
    let first_title = results
        .get("data")
        .and_then(|data| data.get("products"))
        .and_then(|products| products.get(0))
        .and_then(|product| product.get("title"))
        .and_then(Value::as_str);
    tracing::info!("First item: {:?}", first_title);

    let product = client
        .get_product(SAMPLE_PRODUCT_ID)
        .await
        .context("product lookup")?
        .unwrap_or(Value::Null);
    let product_title = product.get("title").and_then(Value::as_str);
    tracing::info!("Product name: {:?}", product_title);

    let store_product_id = match product.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(StoreProductId::new(id.clone())),
        Some(Value::Number(id)) => Some(StoreProductId::new(id.to_string())),
        _ => None,
    };
    tracing::info!("store_product_id: {:?}", store_product_id);

    match store_product_id {
        Some(id) => {
            let cart = client.add_to_cart(&id, 1, "each").await.context("add to cart")?;
            let keys: Vec<&String> = cart
                .as_object()
                .map(|body| body.keys().collect())
                .unwrap_or_default();
            tracing::info!("Cart response keys: {:?}", keys);
        }
        None => {
            tracing::warn!("Could not find store_product_id in product JSON: {}", product);
        }
    }

    Ok(())
}
