//! Common test utilities and fixtures for integration tests.
//!
//! Builds the full router over an in-memory store with scripted extraction
//! engines and a scripted completion client, so tests exercise the real
//! routes and services without any external dependency.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use deckgen_backend::routes::auth::StaticTokenVerifier;
use deckgen_backend::services::backoff::BackoffPolicy;
use deckgen_backend::services::extraction::{
    ExtractError, ExtractionService, OcrEngine, PdfTextEngine,
};
use deckgen_backend::services::generator::FlashcardGenerator;
use deckgen_backend::services::llm::{CompletionClient, ProviderError};
use deckgen_backend::store::memory::MemoryStore;
use deckgen_backend::{app_router, AppState};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_USER: &str = "user-1";

/// PDF engine returning fixed pages, no native dependency required.
pub struct StaticPdfEngine {
    pages: Vec<String>,
}

impl StaticPdfEngine {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl PdfTextEngine for StaticPdfEngine {
    async fn check(&self) -> Result<(), ExtractError> {
        Ok(())
    }

    async fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        Ok(self.pages.clone())
    }
}

/// OCR engine returning fixed text.
pub struct StaticOcrEngine {
    text: String,
}

impl StaticOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl OcrEngine for StaticOcrEngine {
    async fn check(&self) -> Result<(), ExtractError> {
        Ok(())
    }

    async fn recognize(&self, _png: &[u8]) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}

/// Completion client replaying scripted responses in order.
///
/// Once the script runs out it keeps answering with an empty card list.
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("[]".to_string()))
    }
}

/// Test context wiring the router over in-memory collaborators.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub client: Arc<ScriptedCompletion>,
    app: Router,
}

impl TestContext {
    /// Context whose uploads extract to `pages` and whose completion client
    /// replays `responses` in order.
    pub fn new(pages: Vec<String>, responses: Vec<Result<String, ProviderError>>) -> Self {
        Self::with_chunk_size(pages, responses, deckgen_core::chunk::DEFAULT_CHUNK_WORDS)
    }

    pub fn with_chunk_size(
        pages: Vec<String>,
        responses: Vec<Result<String, ProviderError>>,
        chunk_size: usize,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        let client = Arc::new(ScriptedCompletion::new(responses));

        let extractor = ExtractionService::new(
            Arc::new(StaticPdfEngine::new(pages)),
            Arc::new(StaticOcrEngine::new("")),
            chunk_size,
        );
        // Short backoff keeps retrying tests fast.
        let backoff = BackoffPolicy {
            base_delay: Duration::from_millis(1),
            rate_limit_penalty: Duration::from_millis(1),
            ..Default::default()
        };
        let generator = FlashcardGenerator::new(client.clone(), backoff);

        let state = AppState {
            store: store.clone(),
            extractor: Arc::new(extractor),
            generator: Arc::new(generator),
            verifier: Arc::new(StaticTokenVerifier::with_token(TEST_TOKEN, TEST_USER)),
        };
        let app = app_router(state);

        Self { store, client, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Format authorization header value.
    pub fn auth_header_value() -> String {
        format!("Bearer {}", TEST_TOKEN)
    }
}
