//! Shared test helpers for worker API tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use roastduel_core::clock::Clock;
use roastduel_core::ports::{DuelLedger, RoastGenerator};
use roastduel_core::retry::RetryPolicy;
use roastduel_generation::application::coordinator::GenerationCoordinator;
use roastduel_generation::application::synthesizer::RoastSynthesizer;
use roastduel_narrative::application::compiler::NarrativeCompiler;
use roastduel_narrative::application::publisher::NarrativePass;
use roastduel_test_support::{
    FixedClock, InMemoryContentStore, InMemoryLedger, RecordingSink, ScriptedGenerator,
};
use tower::ServiceExt;

use roastduel_worker::scheduler::Passes;
use roastduel_worker::state::AppState;

/// The instant every test runs at.
pub fn now() -> chrono::DateTime<chrono::Utc> {
    FixedClock::noon(2026, 1, 15).0
}

/// Fast retries so failure paths finish quickly.
pub fn retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        jitter_factor: 0.0,
        call_timeout: Duration::from_secs(5),
    }
}

/// In-memory adapters behind a test app.
pub struct Harness {
    pub ledger: Arc<InMemoryLedger>,
    pub store: Arc<InMemoryContentStore>,
    pub sink: Arc<RecordingSink>,
    pub passes: Arc<Passes>,
}

/// Builds the app over in-memory adapters and a fixed clock. Uses the same
/// router as `main.rs`.
pub fn build_test_app(generator: ScriptedGenerator) -> (Router, Harness) {
    let ledger = Arc::new(InMemoryLedger::new());
    build_test_app_with_ledger(generator, ledger.clone(), ledger)
}

/// Like [`build_test_app`], with a separate ledger driving the passes.
pub fn build_test_app_with_ledger(
    generator: ScriptedGenerator,
    ledger: Arc<dyn DuelLedger>,
    inspect: Arc<InMemoryLedger>,
) -> (Router, Harness) {
    let store = Arc::new(InMemoryContentStore::new());
    let sink = Arc::new(RecordingSink::new());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let generator: Arc<dyn RoastGenerator> = Arc::new(generator);

    let generation = GenerationCoordinator::new(
        ledger.clone(),
        store.clone(),
        RoastSynthesizer::new(generator),
        retry(),
    );
    let narrative = NarrativePass::new(
        ledger,
        NarrativeCompiler::new(store.clone(), retry()),
        sink.clone(),
        Arc::clone(&clock),
        retry(),
        chrono::Duration::hours(24),
    );
    let passes = Arc::new(Passes::new(generation, narrative, clock));

    let app = roastduel_worker::app(AppState::new(Arc::clone(&passes)));
    (
        app,
        Harness {
            ledger: inspect,
            store,
            sink,
            passes,
        },
    )
}

/// Send a POST request with an empty body and return the response.
pub async fn post(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
