use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medichain_core::config::{engine_config_from_env_values, knowledge_file_from_env_value};
use medichain_core::{KnowledgeBase, TriageEngine};

/// Main entry point for the MediChain triage service
///
/// Loads the knowledge base, builds the triage engine and serves the REST API.
///
/// # Environment Variables
/// - `MEDICHAIN_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDICHAIN_KNOWLEDGE_FILE`: YAML knowledge base replacing the built-in tables
/// - `MEDICHAIN_MIN_MATCHES`: detected symptoms a condition needs to be selected (default: 2)
/// - `MEDICHAIN_CONFIDENCE_FLOOR`: dampening floor in `[0, 1]` (default: 0.7)
/// - `MEDICHAIN_MAX_ALTERNATIVES`: alternatives returned per diagnosis (default: 3)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, knowledge loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medichain=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MEDICHAIN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = engine_config_from_env_values(
        std::env::var("MEDICHAIN_MIN_MATCHES").ok(),
        std::env::var("MEDICHAIN_CONFIDENCE_FLOOR").ok(),
        std::env::var("MEDICHAIN_MAX_ALTERNATIVES").ok(),
    )?;
    let knowledge_file =
        knowledge_file_from_env_value(std::env::var("MEDICHAIN_KNOWLEDGE_FILE").ok());
    let knowledge = KnowledgeBase::load(knowledge_file)?;

    let engine = TriageEngine::new(Arc::new(knowledge), config);
    let app = api_rest::router(engine);

    tracing::info!("++ Starting MediChain REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- MediChain REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
