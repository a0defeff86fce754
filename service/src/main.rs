//! Pegfall backend service.
//!
//! Thin HTTP shell over the pure engine: an in-memory round store, the
//! lifecycle routes, and a public verification endpoint. All
//! configuration comes from environment variables.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod api;
mod store;

use api::AppState;
use store::RoundStore;

fn read_var(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn read_port(key: &str, fallback: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(fallback)
}

fn cors_layer() -> CorsLayer {
    let raw = read_var("ALLOWED_HTTP_ORIGINS", "");
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();
    if origins.is_empty() {
        warn!("ALLOWED_HTTP_ORIGINS is empty; all browser origins will be rejected");
    }

    let layer = if origins.contains(&"*") {
        CorsLayer::new().allow_origin(AllowOrigin::any())
    } else {
        let values = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Invalid origin in ALLOWED_HTTP_ORIGINS: {}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(values))
    };

    layer
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let host = read_var("PEGFALL_HOST", "0.0.0.0");
    let port = read_port("PEGFALL_PORT", 5000);

    let state = AppState {
        store: Arc::new(RoundStore::new()),
    };
    let app = api::router(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("invalid listen addr")?;
    info!(%addr, "pegfall service listening");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
