//! # insight-api
//!
//! HTTP surface for the InsightBoard dependency engine.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /transcripts` | Submit a transcript, returns `{jobId, transcriptId, cached}` |
//! | `GET /jobs/:id` | Poll an extraction job |
//! | `GET /transcripts/:id` | Transcript with its current tasks |
//! | `GET /health` | Liveness and version |

pub mod config;
pub mod error;
pub mod handlers;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use insight_jobs::{QueryService, SubmissionGate};

pub use config::{ServerConfig, StoreBackend};
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub gate: SubmissionGate,
    pub query: QueryService,
}

impl AppState {
    pub fn new(gate: SubmissionGate, query: QueryService) -> Self {
        Self { gate, query }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse a comma-separated origin list, skipping entries that are not
/// valid header values.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    subsystem = "api",
                    component = "cors",
                    op = "parse",
                    origin,
                    "Ignoring invalid CORS origin"
                );
                None
            }
        })
        .collect()
}

fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed_origins)
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build the application router. An empty origin list allows any origin.
pub fn router(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/transcripts", post(handlers::transcripts::submit_transcript))
        .route("/transcripts/:id", get(handlers::transcripts::get_transcript))
        .route("/jobs/:id", get(handlers::jobs::get_job))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}
