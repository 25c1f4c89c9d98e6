pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::routes::auth::{StaticTokenVerifier, TokenVerifier};
use crate::services::backoff::BackoffPolicy;
use crate::services::extraction::ExtractionService;
use crate::services::generator::FlashcardGenerator;
use crate::services::llm::OpenRouterClient;
use crate::services::ocr::TesseractEngine;
use crate::services::pdf::PopplerEngine;
use crate::store::memory::MemoryStore;
use crate::store::DocumentStore;

/// Maximum accepted upload size.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub extractor: Arc<ExtractionService>,
    pub generator: Arc<FlashcardGenerator>,
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Build the application router over `state`.
pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/flashcards/generate", post(routes::generate::generate))
        .route("/api/sync", post(routes::sync::sync))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = MemoryStore::shared();

    let llm = Arc::new(OpenRouterClient::from_env()?);
    if !llm.check_health().await {
        tracing::warn!("completion provider health check failed at startup");
    }

    let chunk_size = env_parse("CHUNK_WORDS", deckgen_core::chunk::DEFAULT_CHUNK_WORDS);
    let extractor = ExtractionService::new(
        Arc::new(PopplerEngine),
        Arc::new(TesseractEngine),
        chunk_size,
    );
    let generator = FlashcardGenerator::new(llm, BackoffPolicy::default());

    let state = AppState {
        store,
        extractor: Arc::new(extractor),
        generator: Arc::new(generator),
        verifier: Arc::new(StaticTokenVerifier::from_env()),
    };

    // The request timeout bounds the whole pipeline, including extraction
    // and generation.
    let request_timeout = Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 120));
    let app = app_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(request_timeout)),
    );

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

async fn health_check() -> &'static str {
    "OK"
}
