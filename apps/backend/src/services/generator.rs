//! Flashcard generation from text chunks.

use std::sync::Arc;

use deckgen_core::response::parse_flashcards;
use deckgen_core::types::Flashcard;

use super::backoff::BackoffPolicy;
use super::llm::{CompletionClient, ProviderError};

/// Prompt sent to the completion model for one chunk of text.
const PROMPT_TEMPLATE: &str = "\
Generate flashcards from this text. Return a JSON list with 'front' and 'back' keys. Return a max of only 10 flashcards.

Text:
{chunk}

Return only the JSON list, like:
[
  {\"front\": \"...\", \"back\": \"...\"},
  ...
]
";

/// Generates flashcards one chunk at a time, retrying transient provider
/// failures with exponential backoff.
///
/// Chunks are independent: a chunk that fails permanently does not affect
/// the cards produced for any other chunk.
pub struct FlashcardGenerator {
    client: Arc<dyn CompletionClient>,
    backoff: BackoffPolicy,
}

impl FlashcardGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, backoff: BackoffPolicy) -> Self {
        Self { client, backoff }
    }

    /// Generate flashcards for a single chunk.
    ///
    /// Transient provider failures are retried per the backoff policy and
    /// surface as a typed [`ProviderError`] once retries are exhausted. A
    /// response that is not valid JSON is treated as permanently malformed
    /// content for this chunk: it yields an empty list immediately, with no
    /// retries.
    pub async fn generate(&self, chunk: &str) -> Result<Vec<Flashcard>, ProviderError> {
        let prompt = build_prompt(chunk);

        let mut attempt = 0;
        loop {
            tracing::info!(
                attempt = attempt + 1,
                total = self.backoff.max_retries + 1,
                "requesting flashcards"
            );

            let err = match self.client.complete(&prompt).await {
                Ok(raw) => {
                    return match parse_flashcards(&raw) {
                        Ok(cards) => {
                            tracing::info!(count = cards.len(), "generated flashcards");
                            Ok(cards)
                        }
                        Err(parse_err) => {
                            tracing::error!(
                                error = %parse_err,
                                "model returned malformed flashcard JSON, yielding no cards"
                            );
                            Ok(Vec::new())
                        }
                    };
                }
                Err(err) => err,
            };

            if attempt >= self.backoff.max_retries {
                tracing::error!(error = %err, "flashcard generation failed after retries");
                return Err(err);
            }

            let delay = match &err {
                ProviderError::RateLimited(_) => self.backoff.delay_for_rate_limit(attempt),
                _ => self.backoff.delay_for(attempt),
            };
            tracing::warn!(
                error = %err,
                delay_secs = delay.as_secs_f64(),
                "provider call failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn build_prompt(chunk: &str) -> String {
    PROMPT_TEMPLATE.replace("{chunk}", chunk)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    struct ScriptedClient {
        responses: Mutex<VecDeque<Result<String, ProviderError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn upstream() -> ProviderError {
        ProviderError::Upstream("502 Bad Gateway".to_string())
    }

    fn generator(client: Arc<ScriptedClient>) -> FlashcardGenerator {
        FlashcardGenerator::new(client, BackoffPolicy::default())
    }

    #[test]
    fn test_prompt_contains_chunk_and_cap() {
        let prompt = build_prompt("the mitochondria is the powerhouse");
        assert!(prompt.contains("the mitochondria is the powerhouse"));
        assert!(prompt.contains("max of only 10 flashcards"));
        assert!(!prompt.contains("{chunk}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_failures_then_success() {
        let client = ScriptedClient::new(vec![
            Err(upstream()),
            Err(upstream()),
            Err(upstream()),
            Ok(r#"[{"front": "Q1", "back": "A1"}]"#.to_string()),
        ]);
        let started = tokio::time::Instant::now();

        let cards = generator(client.clone()).generate("text").await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "Q1");
        assert_eq!(client.calls(), 4);

        // Strictly increasing delays: 2s + 4s + 8s of paused-clock time.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(14));
        assert!(elapsed < Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_empty_without_retry() {
        let client = ScriptedClient::new(vec![Ok(
            "Sorry, I cannot generate flashcards for this text.".to_string()
        )]);

        let cards = generator(client.clone()).generate("text").await.unwrap();

        assert!(cards.is_empty());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_exhaustion_is_terminal() {
        let client = ScriptedClient::new(vec![
            Err(upstream()),
            Err(upstream()),
            Err(upstream()),
            Err(upstream()),
        ]);

        let err = generator(client.clone()).generate("text").await.unwrap_err();

        assert!(matches!(err, ProviderError::Upstream(_)));
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_longer() {
        let client = ScriptedClient::new(vec![
            Err(ProviderError::RateLimited("429".to_string())),
            Ok("[]".to_string()),
        ]);
        let started = tokio::time::Instant::now();

        let cards = generator(client.clone()).generate("text").await.unwrap();

        assert!(cards.is_empty());
        assert_eq!(client.calls(), 2);
        // 2s backoff plus the 5s rate-limit penalty.
        assert!(started.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhaustion_is_terminal() {
        let client = ScriptedClient::new(vec![
            Err(ProviderError::RateLimited("429".to_string())),
            Err(ProviderError::RateLimited("429".to_string())),
            Err(ProviderError::RateLimited("429".to_string())),
            Err(ProviderError::RateLimited("429".to_string())),
        ]);

        let err = generator(client.clone()).generate("text").await.unwrap_err();

        assert!(matches!(err, ProviderError::RateLimited(_)));
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_retried_like_upstream() {
        let client = ScriptedClient::new(vec![
            Err(ProviderError::Timeout("deadline exceeded".to_string())),
            Ok(r#"[{"front": "Q", "back": "A"}]"#.to_string()),
        ]);

        let cards = generator(client.clone()).generate("text").await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_fenced_response_parsed() {
        let client = ScriptedClient::new(vec![Ok(
            "```json\n[{\"front\": \"Q\", \"back\": \"A\"}]\n```".to_string()
        )]);

        let cards = generator(client).generate("text").await.unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_array_response_is_success() {
        let client = ScriptedClient::new(vec![Ok("[]".to_string())]);
        let cards = generator(client.clone()).generate("text").await.unwrap();
        assert!(cards.is_empty());
        assert_eq!(client.calls(), 1);
    }
}
