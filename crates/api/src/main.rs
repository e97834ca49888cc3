use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use copypanda_api::config::ServerConfig;
use copypanda_api::engine::RunLauncher;
use copypanda_api::router::build_app_router;
use copypanda_api::state::AppState;
use copypanda_db::repositories::ArticleRepo;
use copypanda_events::RunRegistry;
use copypanda_llm::{LlmConfig, OpenAiClient, TextGenerator};
use copypanda_pipeline::ArticlePipeline;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often finished run channels are swept.
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Error recorded on articles left running by a previous process.
const INTERRUPTED_MESSAGE: &str = "Generation was interrupted by a server restart";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "copypanda_api=debug,copypanda_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        max_concurrent_runs = config.max_concurrent_runs,
        section_concurrency = config.section_concurrency,
        failure_policy = config.failure_policy.as_str(),
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = copypanda_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    copypanda_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    copypanda_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // Runs never survive a restart; close out whatever the last process left.
    let reconciled = ArticleRepo::fail_stale_running(&pool, INTERRUPTED_MESSAGE)
        .await
        .expect("Failed to reconcile running articles");
    if reconciled > 0 {
        tracing::warn!(count = reconciled, "Marked interrupted articles as failed");
    }

    // --- Text generation ---
    let llm_config = LlmConfig::from_env().expect("Invalid LLM configuration");
    let client = OpenAiClient::new(llm_config).expect("Failed to build LLM client");
    tracing::info!(model = client.model_name(), "Text generator configured");
    let generator: Arc<dyn TextGenerator> = Arc::new(client);

    // --- Run registry + eviction ---
    let registry = Arc::new(RunRegistry::new());
    let eviction_cancel = CancellationToken::new();
    let eviction_handle = tokio::spawn(Arc::clone(&registry).run_eviction(
        Duration::from_secs(config.run_retention_secs),
        EVICTION_INTERVAL,
        eviction_cancel.clone(),
    ));

    // --- Run launcher ---
    let pipeline = ArticlePipeline::new(Arc::clone(&generator), config.pipeline_options());
    let launcher = Arc::new(RunLauncher::new(
        pool.clone(),
        pipeline,
        config.max_concurrent_runs,
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        registry,
        launcher: Arc::clone(&launcher),
        generator,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!(
        active_runs = launcher.active_runs(),
        "Server stopped accepting connections, draining runs"
    );

    let drained = launcher
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    if drained {
        tracing::info!("All runs finished");
    } else {
        tracing::warn!(
            active_runs = launcher.active_runs(),
            "Shutdown timeout reached with runs still in flight"
        );
    }

    eviction_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), eviction_handle).await;
    tracing::info!("Run eviction stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
