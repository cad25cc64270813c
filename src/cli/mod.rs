//! CLI module for the MockAI server.
//!
//! This module provides the `mockai serve` command implementation.

mod config;
pub mod handlers;
mod state;

pub use config::{Config, ConfigError};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Run the MockAI server with the given configuration
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("Starting MockAI server on {}", addr);
    tracing::info!(
        "Configuration: tokenizer={}, cadence={}ms, max_request_delay={}ms, default_token_budget={}",
        config.tokenizer.strategy,
        config.stream.cadence_ms,
        config.limits.max_request_delay_ms,
        config.limits.default_token_budget
    );
    tracing::info!("OpenAI endpoints: {}/...", config.routes.openai_prefix);
    tracing::info!("Anthropic endpoints: {}/...", config.routes.anthropic_prefix);

    let app = build_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Build the application router from shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    let openai = &state.config.routes.openai_prefix;
    let anthropic = &state.config.routes.anthropic_prefix;

    Router::new()
        .route("/health", get(handlers::health))
        // OpenAI API routes
        .route(
            &format!("{}/chat/completions", openai),
            post(handlers::chat_completions),
        )
        .route(&format!("{}/models", openai), get(handlers::list_models))
        .route(
            &format!("{}/models/{{model_id}}", openai),
            get(handlers::get_model),
        )
        .route(
            &format!("{}/images/generations", openai),
            post(handlers::generate_images),
        )
        // Anthropic API routes
        .route(
            &format!("{}/messages", anthropic),
            post(handlers::messages),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
