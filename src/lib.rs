//! code-guardian: AI-assisted review of GitHub pull requests and repositories
//! (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod analysis;
pub mod completion;
pub mod config;
pub mod constants;
pub mod env;
pub mod hosting;
pub mod models;
pub mod output;
pub mod progress;
pub mod review;
pub mod source;
