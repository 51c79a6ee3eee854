use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use cafepos_api::{
    app_router,
    config::{init_tracing, load_config},
    seed::seed_if_empty,
    store::RecordStore,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_tracing(config.log_level(), config.log_json);
    info!(environment = %config.environment, "starting cafepos-api");

    let store = Arc::new(RecordStore::new());
    if config.seed_on_start {
        seed_if_empty(&store, &config)?;
    }

    let cors_layer = build_cors_layer(config.cors_allowed_origins.as_deref(), config.is_development())?;
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, store);

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_cors_layer(
    raw_origins: Option<&str>,
    is_development: bool,
) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let configured: Vec<HeaderValue> = raw_origins
        .unwrap_or("")
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                None
            } else {
                HeaderValue::from_str(trimmed).ok()
            }
        })
        .collect();

    if !configured.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(configured)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    if is_development {
        info!("no CORS origins configured; using permissive CORS for development");
        return Ok(CorsLayer::permissive());
    }
    error!("missing CORS configuration; set APP__CORS_ALLOWED_ORIGINS");
    Err("missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS".into())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
