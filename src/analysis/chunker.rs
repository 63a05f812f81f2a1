//! Whitespace-token chunking for oversized inputs.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChunkError {
    #[error("invalid chunk size {0}: must be at least 1 token")]
    InvalidSize(usize),
}

/// Split `text` into pieces of at most `max_tokens` whitespace-separated tokens.
///
/// Tokens are re-joined with single spaces, so runs of whitespace (including
/// newlines) collapse. Empty or whitespace-only input yields zero chunks.
pub fn chunk(text: &str, max_tokens: usize) -> Result<Vec<String>, ChunkError> {
    if max_tokens == 0 {
        return Err(ChunkError::InvalidSize(max_tokens));
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    Ok(tokens
        .chunks(max_tokens)
        .map(|piece| piece.join(" "))
        .collect())
}
