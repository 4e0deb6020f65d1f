//! OpenAI-compatible extraction backend.
//!
//! Works with any endpoint that speaks the chat completions API, including
//! OpenAI, Azure OpenAI, Ollama in compatibility mode, vLLM, and LM Studio.
//!
//! # Example
//!
//! ```rust,no_run
//! use insight_core::TaskExtractor;
//! use insight_inference::openai::{OpenAIConfig, OpenAIExtractor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let extractor = OpenAIExtractor::new(OpenAIConfig::from_env()).unwrap();
//!     let tasks = extractor.extract_tasks("Alice drafts the plan.").await.unwrap();
//!     println!("{} candidates", tasks.len());
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIConfig, OpenAIExtractor, MISSING_KEY_MESSAGE};
pub use error::{to_insight_error, OpenAIErrorCode};
pub use types::*;
