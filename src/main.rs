use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::extract::Path;
use axum::routing::get;
use axum::Router;
use axum_localize::config::Config;
use axum_localize::Localizer;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("axum_localize=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    info!("Loading catalogs from {}", config.catalog_dir.display());
    let localize = config
        .i18n()
        .localize()
        .context("Failed to load message catalogs")?;

    let app = Router::new()
        .route("/", get(welcome))
        .route("/:name", get(welcome_with_name))
        .route("/lng/current", get(current))
        .layer(localize)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn welcome(l: Localizer) -> String {
    l.t("welcome")
}

async fn welcome_with_name(l: Localizer, Path(name): Path<String>) -> String {
    l.t_with("welcomeWithName", &json!({ "name": name }))
}

async fn current(l: Localizer) -> String {
    l.current_language().to_string()
}
