//! # Knowledge Center
//!
//! A retrieval-augmented question answering service.
//!
//! This library provides:
//! - Ingestion of one documentation page into an in-memory vector index
//! - Encyclopedia, preprint and documentation search tools
//! - A tool-calling agent loop over an OpenAI-compatible model
//! - An HTTP server with a single page UI
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a question via the API
//! 2. Build context with system prompt and available tools
//! 3. Call the model, run any tool calls it requests
//! 4. Feed results back to the model, repeat until it answers
//!
//! ## Example
//!
//! ```rust,ignore
//! use knowledge_center::{config::Config, startup};
//!
//! let config = Config::from_env()?;
//! let components = startup::build(&config).await?;
//! let turn = components.harness.run("What is LangSmith used for?").await?;
//! println!("{}", turn.answer);
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod embeddings;
pub mod harness;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod startup;
pub mod tools;

#[cfg(test)]
mod testing;

pub use config::Config;
