//! Model client abstraction layer
//!
//! The pipeline talks to language models only through [`ModelClient`], so the
//! local CLI runtime and the scripted test double are interchangeable.

mod client;
mod error;
mod mock;
mod ollama;

pub use client::ModelClient;
pub use error::BackendError;
pub use mock::{MockModelClient, MockResponse};
pub use ollama::OllamaCliClient;
