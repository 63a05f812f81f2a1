//! CompletionClient trait and LLM integration.
//!
//! Provides an abstraction layer over the chat completion API so the
//! analysis pipeline can run against the real service or a canned test
//! implementation.

pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from the completion client.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// No API credential configured; raised before any request is sent.
    #[error("completion API not configured: {0}")]
    NotConfigured(String),

    /// Network failure, non-success HTTP status, or an undecodable body.
    #[error("completion API error: {0}")]
    Transport(String),

    #[error("no response from the completion API (zero choices returned)")]
    EmptyResponse,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The two-message exchange sent for a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Persona instruction for the system role.
    pub system: String,
    /// Instruction followed by the body under review.
    pub user: String,
}

impl Exchange {
    /// The exchange as wire messages: system first, then user.
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user.clone(),
            },
        ]
    }
}

/// Per-request knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Cap on generated tokens; `None` leaves it to the API default.
    pub max_tokens: Option<u32>,
}

/// Trait for chat-completion backends.
///
/// One call is one request: implementations must not retry or batch.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the exchange and return the first choice's text verbatim.
    async fn complete(
        &self,
        exchange: &Exchange,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;
}
