//! Roast duel worker entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use roastduel_core::clock::{Clock, SystemClock};
use roastduel_core::ports::{ContentStore, DuelLedger, NarrativeSink};
use roastduel_generation::application::coordinator::GenerationCoordinator;
use roastduel_generation::application::synthesizer::RoastSynthesizer;
use roastduel_http::{GatewayContentStore, HttpDuelLedger, OpenAiGenerator};
use roastduel_narrative::application::compiler::NarrativeCompiler;
use roastduel_narrative::application::publisher::NarrativePass;
use roastduel_store::pg_content_store::PgContentStore;
use roastduel_worker::config::{StoreConfig, WorkerConfig};
use roastduel_worker::error::AppError;
use roastduel_worker::scheduler::{self, Passes, Schedule};
use roastduel_worker::sink::TracingSink;
use roastduel_worker::state::AppState;
use roastduel_worker::telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let telemetry = telemetry::init(
        std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.is_empty()),
    )?;

    tracing::info!("Starting roast duel worker");

    let config = WorkerConfig::from_env()?;

    let store = content_store(&config.store).await?;
    let ledger: Arc<dyn DuelLedger> = Arc::new(HttpDuelLedger::new(
        config.ledger_url.clone(),
        config.ledger_token.clone(),
    ));
    let generator = Arc::new(OpenAiGenerator::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    ));
    let sink: Arc<dyn NarrativeSink> = Arc::new(TracingSink);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let generation = GenerationCoordinator::new(
        Arc::clone(&ledger),
        Arc::clone(&store),
        RoastSynthesizer::new(generator),
        config.retry.clone(),
    )
    .with_concurrency(config.generation_concurrency);
    let narrative = NarrativePass::new(
        ledger,
        NarrativeCompiler::new(store, config.retry.clone()),
        sink,
        Arc::clone(&clock),
        config.retry.clone(),
        config.narrative_window,
    )
    .with_limit(config.finished_duels_limit);

    let passes = Arc::new(Passes::new(generation, narrative, clock));
    let timers = scheduler::spawn(
        &passes,
        Schedule {
            generation_every: config.generation_interval,
            narrative_every: config.narrative_interval,
        },
    );

    let app = roastduel_worker::app(AppState::new(passes));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for timer in timers {
        timer.abort();
    }
    tracing::info!("Roast duel worker stopped");
    telemetry.shutdown();

    Ok(())
}

async fn content_store(config: &StoreConfig) -> Result<Arc<dyn ContentStore>, AppError> {
    match config {
        StoreConfig::Gateway {
            upload_url,
            gateway_url,
            token,
        } => Ok(Arc::new(GatewayContentStore::new(
            upload_url.clone(),
            gateway_url.clone(),
            token.clone(),
        ))),
        StoreConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            let store = PgContentStore::new(pool);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
