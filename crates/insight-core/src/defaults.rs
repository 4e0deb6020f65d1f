//! Centralized default constants for InsightBoard.
//!
//! Crates reference these instead of defining their own magic numbers.

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Default Postgres URL when `DATABASE_URL` is unset.
pub const DATABASE_URL: &str = "postgres://localhost/insightboard";

// =============================================================================
// EXTRACTION
// =============================================================================

/// Provider used when `LLM_PROVIDER` is unset.
pub const LLM_PROVIDER: &str = "mock";

/// Default generation model for the OpenAI-compatible backend.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// HTTP timeout for model calls, in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature for task extraction. Zero keeps output stable.
pub const GEN_TEMPERATURE: f32 = 0.0;

/// Completion token cap for task extraction.
pub const GEN_MAX_TOKENS: u32 = 1500;

/// Maximum number of lines the stub extractor turns into tasks.
pub const STUB_MAX_TASKS: usize = 6;

/// Maximum description length (characters) produced by the stub extractor.
pub const STUB_DESCRIPTION_CHARS: usize = 200;

/// Dependency the stub extractor plants on its first task to exercise
/// sanitization.
pub const STUB_DANGLING_DEPENDENCY: &str = "unknown_task_id";

// =============================================================================
// JOBS
// =============================================================================

/// Maximum concurrent extraction jobs per worker.
pub const JOB_MAX_CONCURRENT: usize = 4;

/// Worker event broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;
