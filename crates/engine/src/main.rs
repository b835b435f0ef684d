//! Placebook Engine - Main entry point.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use placebook_engine::api;
use placebook_engine::infrastructure::{
    auth::JwtAuthenticator, clock::SystemClock, config::AppConfig, sqlite::SqliteRepositories,
};
use placebook_engine::App;

/// How long cancelled requests get to unwind once the drain period is over.
const ABORT_GRACE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    let config = AppConfig::from_env()?;
    init_tracing(&config);

    tracing::info!("Starting Placebook Engine");

    let signal_token = CancellationToken::new();
    setup_shutdown_signal(signal_token.clone());

    // Connect to storage
    tracing::info!(url = %config.sql.url, "Connecting to SQLite");
    let storage = Arc::new(SqliteRepositories::connect(&config.sql).await?);

    let authenticator = Arc::new(JwtAuthenticator::new(
        &config.jwt,
        Arc::new(SystemClock::new()),
    ));

    // Cancelled only after the drain period, to abort stragglers
    let request_token = CancellationToken::new();
    let app = Arc::new(App::new(
        storage.clone(),
        authenticator,
        config.http.request_timeout,
        request_token.clone(),
    ));

    let mut router = api::http::router(app).layer(TraceLayer::new_for_http());
    if let Some(cors) = build_cors_layer(config.http.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    tracing::info!("Listening on {}", config.http.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.http.bind_addr).await?;
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(signal_token.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = signal_token.cancelled() => {
            tracing::info!(
                timeout_secs = config.http.shutdown_timeout.as_secs(),
                "Draining in-flight requests"
            );
            match tokio::time::timeout(config.http.shutdown_timeout, &mut server).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!("Shutdown timeout elapsed, cancelling in-flight requests");
                    request_token.cancel();
                    if tokio::time::timeout(ABORT_GRACE, &mut server).await.is_err() {
                        tracing::warn!("Requests still running after cancellation, exiting");
                    }
                }
            }
        }
    }

    storage.close().await;
    tracing::info!("Placebook Engine shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let default_filter = if config.debug {
        "placebook_engine=debug,tower_http=debug"
    } else {
        "placebook_engine=info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        cancel_token.cancel();
    });
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // Bearer tokens and JSON bodies trigger CORS preflights.
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
