//! taskling HTTP server.
//!
//! Serves the task API over the shared parser and store. Classifier model
//! artifacts are loaded best-effort at startup; their absence only disables
//! the statistical fallbacks.
//!
//! Build and run: `cargo run --features server --bin taskling-server`

use std::sync::Arc;

use taskling::classify::FallbackModels;
use taskling::command::CommandParser;
use taskling::paths::TasklingPaths;
use taskling::server::{AppState, router};
use taskling::store::TaskStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("TASKLING_SERVER_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("TASKLING_SERVER_PORT").unwrap_or_else(|_| "8300".to_string());
    let addr = format!("{bind}:{port}");

    let paths = TasklingPaths::resolve().unwrap_or_else(|e| {
        tracing::error!("failed to resolve XDG paths: {e}");
        std::process::exit(1);
    });
    if let Err(e) = paths.ensure_dirs() {
        tracing::error!("failed to create XDG directories: {e}");
        std::process::exit(1);
    }

    let models = FallbackModels::load(&paths.models_dir());
    let store = TaskStore::open(&paths.db_dir()).unwrap_or_else(|e| {
        tracing::error!("failed to open task store: {e}");
        std::process::exit(1);
    });

    let state = Arc::new(AppState {
        parser: CommandParser::with_models(&models),
        store,
        intent_model: models.intent.clone(),
    });

    tracing::info!("taskling server initialized");

    let app = router(state);

    tracing::info!("taskling server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
