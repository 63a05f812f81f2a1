//! Analysis core: chunk the input, prompt the completion API per chunk, and
//! merge the answers.
//!
//! Chunks are sent strictly one after another. The first failure aborts the
//! aggregation and nothing partial is returned for that prompt.

pub mod chunker;
pub mod prompt;

use thiserror::Error;

use crate::completion::{CompletionClient, CompletionError, CompletionOptions};

pub use chunker::{ChunkError, chunk};
pub use prompt::{PR_REVIEW_INSTRUCTION, Persona, compose, section_instruction};

/// Separator placed between per-chunk answers.
pub const MERGE_SEPARATOR: &str = "\n\n";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// How the input text is fed to the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
    /// One request carrying the whole text.
    Whole,
    /// One request per chunk of at most `max_tokens` whitespace tokens.
    Chunked { max_tokens: usize },
}

/// Run `instruction` against `text` and return the merged completion text.
pub async fn aggregate(
    client: &dyn CompletionClient,
    persona: Persona,
    instruction: &str,
    text: &str,
    mode: ChunkMode,
    options: &CompletionOptions,
) -> Result<String, AnalysisError> {
    match mode {
        ChunkMode::Whole => {
            let exchange = compose(persona, instruction, text);
            Ok(client.complete(&exchange, options).await?)
        }
        ChunkMode::Chunked { max_tokens } => {
            let chunks = chunk(text, max_tokens)?;
            let total = chunks.len();
            let mut answers = Vec::with_capacity(total);

            for (i, piece) in chunks.iter().enumerate() {
                tracing::debug!(chunk = i + 1, total, "requesting completion for chunk");
                let exchange = compose(persona, instruction, piece);
                let answer = client.complete(&exchange, options).await.map_err(|e| {
                    tracing::debug!(chunk = i + 1, total, error = %e, "chunk failed");
                    e
                })?;
                answers.push(answer);
            }

            Ok(answers.join(MERGE_SEPARATOR))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Exchange;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted answers in order and records every exchange it sees.
    struct ScriptedClient {
        answers: Mutex<VecDeque<Result<String, CompletionError>>>,
        seen: Mutex<Vec<Exchange>>,
    }

    impl ScriptedClient {
        fn new(answers: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Exchange> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(
            &self,
            exchange: &Exchange,
            _options: &CompletionOptions,
        ) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(exchange.clone());
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(CompletionError::EmptyResponse))
        }
    }

    fn ok(s: &str) -> Result<String, CompletionError> {
        Ok(s.to_string())
    }

    #[tokio::test]
    async fn chunk_answers_join_in_order() {
        let client = ScriptedClient::new(vec![ok("r0"), ok("r1"), ok("r2")]);
        let merged = aggregate(
            &client,
            Persona::CodeReviewer,
            "Summarize.",
            "a b c d e",
            ChunkMode::Chunked { max_tokens: 2 },
            &CompletionOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(merged, "r0\n\nr1\n\nr2");
        let bodies: Vec<String> = client.seen().into_iter().map(|e| e.user).collect();
        assert_eq!(
            bodies,
            vec!["Summarize.\n\na b", "Summarize.\n\nc d", "Summarize.\n\ne"]
        );
    }

    #[tokio::test]
    async fn empty_text_chunked_makes_no_calls() {
        let client = ScriptedClient::new(vec![]);
        let merged = aggregate(
            &client,
            Persona::CodeReviewer,
            "Summarize.",
            "   ",
            ChunkMode::Chunked { max_tokens: 10 },
            &CompletionOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(merged, "");
        assert!(client.seen().is_empty());
    }

    #[tokio::test]
    async fn first_failure_aborts_remaining_chunks() {
        let client = ScriptedClient::new(vec![
            ok("r0"),
            Err(CompletionError::Transport("HTTP 500".into())),
            ok("r2"),
        ]);
        let err = aggregate(
            &client,
            Persona::CodeReviewer,
            "x",
            "a b c",
            ChunkMode::Chunked { max_tokens: 1 },
            &CompletionOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Completion(CompletionError::Transport(ref m)) if m == "HTTP 500"
        ));
        assert_eq!(client.seen().len(), 2);
    }

    #[tokio::test]
    async fn zero_chunk_size_fails_before_any_call() {
        let client = ScriptedClient::new(vec![ok("unused")]);
        let err = aggregate(
            &client,
            Persona::CodeReviewer,
            "x",
            "a b",
            ChunkMode::Chunked { max_tokens: 0 },
            &CompletionOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalysisError::Chunk(ChunkError::InvalidSize(0))));
        assert!(client.seen().is_empty());
    }

    #[tokio::test]
    async fn whole_mode_sends_text_verbatim_once() {
        let diff = "@@ -1 +1 @@\n-a\n+b\n";
        let client = ScriptedClient::new(vec![ok("looks good")]);
        let answer = aggregate(
            &client,
            Persona::PrReviewer,
            PR_REVIEW_INSTRUCTION,
            diff,
            ChunkMode::Whole,
            &CompletionOptions {
                max_tokens: Some(500),
            },
        )
        .await
        .unwrap();

        assert_eq!(answer, "looks good");
        let seen = client.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user, format!("{PR_REVIEW_INSTRUCTION}\n\n{diff}"));
        assert_eq!(seen[0].system, Persona::PrReviewer.system_prompt());
    }

    #[tokio::test]
    async fn whole_mode_failure_surfaces_unchanged() {
        let client = ScriptedClient::new(vec![Err(CompletionError::EmptyResponse)]);
        let err = aggregate(
            &client,
            Persona::PrReviewer,
            PR_REVIEW_INSTRUCTION,
            "diff",
            ChunkMode::Whole,
            &CompletionOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Completion(CompletionError::EmptyResponse)
        ));
    }
}
