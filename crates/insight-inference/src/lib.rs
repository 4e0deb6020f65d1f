//! # insight-inference
//!
//! Task extraction backends for InsightBoard.
//!
//! - [`StubExtractor`]: deterministic, line-based, no network
//! - [`openai::OpenAIExtractor`]: any OpenAI-compatible chat completions API
//! - [`ConfiguredExtractors`]: environment-driven backend selection
//!
//! Model output is recovered with [`parse_task_list`], which never fails.

pub mod openai;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod stub;

pub use openai::{OpenAIConfig, OpenAIExtractor};
pub use parse::parse_task_list;
pub use provider::{ConfiguredExtractors, ExtractorConfig, LlmProvider};
pub use stub::StubExtractor;
