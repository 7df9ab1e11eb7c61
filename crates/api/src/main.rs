use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guardian_agents::{AgentRegistry, AgentsConfig};
use guardian_api::background::vitals_retention;
use guardian_api::config::ServerConfig;
use guardian_api::router::build_app_router;
use guardian_api::state::AppState;
use guardian_llm::{ChatCompletionClient, LlmConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "guardian_api=debug,guardian_agents=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Narrative backend ---
    let llm_config = LlmConfig::from_env();
    tracing::info!(model = %llm_config.model, base_url = %llm_config.base_url, "LLM client configured");
    let client = ChatCompletionClient::new(llm_config).context("Failed to build LLM client")?;
    if !client.is_configured() {
        tracing::warn!("OPENAI_API_KEY not set, generation requests will fail");
    }

    // --- Database ---
    let pool = guardian_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    guardian_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    guardian_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Agents ---
    let agents_config = AgentsConfig::load(&config.agents_config)?;
    let agents = Arc::new(AgentRegistry::build(
        &agents_config,
        pool.clone(),
        Arc::new(client),
    )?);
    agents.initialize_enabled().await?;
    tracing::info!(agents = ?agents.enabled_keys(), "Agents initialized");

    // --- Background jobs ---
    let retention_cancel = CancellationToken::new();
    let retention_handle = tokio::spawn(vitals_retention::run(
        pool.clone(),
        config.vitals_retention_days,
        retention_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        agents: Arc::clone(&agents),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    retention_cancel.cancel();
    let _ = tokio::time::timeout(grace, retention_handle).await;
    tracing::info!("Retention job stopped");

    if tokio::time::timeout(grace, agents.shutdown_all()).await.is_err() {
        tracing::warn!("Agents did not shut down in time");
    }

    guardian_db::close(&pool).await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
