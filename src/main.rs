use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use script_search_backend::config;
use script_search_backend::datasource::DataSourceProvisioner;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "script_search_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 設定を読み込む
    let app_config = config::load_config()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    if app_config.database.remote_url.is_empty() {
        tracing::warn!("database.remote_url is empty; search requests will fail until it is set in config.json");
    }

    let provisioner = DataSourceProvisioner::new(
        app_config.database.remote_url.clone(),
        app_config.database.download_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("Failed to build provisioner: {}", e))?;

    let state = Arc::new(AppState { provisioner });

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        // POST searches; other methods get an explicit 405 body, and the
        // CORS layer answers the OPTIONS preflight
        // POSTで検索。他メソッドは405、プリフライトはCORSレイヤが応答する
        .route(
            "/api/search",
            post(api::search::search).fallback(api::search::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
