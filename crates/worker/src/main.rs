use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use odeon_inference::client::{InferenceClient, InferenceConfig};
use odeon_worker::config::WorkerConfig;
use odeon_worker::dispatcher::Dispatcher;
use odeon_worker::orchestrator::Orchestrator;
use odeon_worker::watchdog::Watchdog;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "odeon_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    tracing::info!(?config, "Loaded worker configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = odeon_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    odeon_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    odeon_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Inference backend ---
    let inference = InferenceClient::new(InferenceConfig::from_env())
        .expect("Failed to build inference client");

    // --- Orchestration services ---
    let orchestrator = Arc::new(Orchestrator::new(pool.clone(), Arc::new(inference)));
    let dispatcher = Dispatcher::new(
        pool.clone(),
        orchestrator,
        Duration::from_millis(config.poll_interval_ms),
    );
    let watchdog = Watchdog::new(pool.clone(), &config);

    let cancel = CancellationToken::new();

    let dispatcher_cancel = cancel.clone();
    let dispatcher_handle = tokio::spawn(async move {
        dispatcher.run(dispatcher_cancel).await;
    });

    let watchdog_cancel = cancel.clone();
    let watchdog_handle = tokio::spawn(async move {
        watchdog.run(watchdog_cancel).await;
    });

    tracing::info!("Worker started");

    // --- Graceful shutdown ---
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown signal received");
    cancel.cancel();

    let _ = dispatcher_handle.await;
    let _ = watchdog_handle.await;
    tracing::info!("Worker stopped");
}
