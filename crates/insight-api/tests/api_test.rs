//! HTTP tests for the InsightBoard API, driven through the router with the
//! in-memory store and the stub extractor.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use insight_api::{router, AppState};
use insight_db::Database;
use insight_inference::{ConfiguredExtractors, ExtractorConfig};
use insight_jobs::{JobWorker, QueryService, SubmissionGate, WorkerConfig, WorkerHandle};

fn test_app() -> (Router, WorkerHandle) {
    let db = Database::in_memory();
    let extractors = Arc::new(ConfiguredExtractors::new(ExtractorConfig::default()));
    let (worker, queue) = JobWorker::new(db.clone(), extractors, WorkerConfig::default());
    let handle = worker.start();
    let state = AppState::new(SubmissionGate::new(db.clone(), queue), QueryService::new(db));
    (router(state, Vec::new()), handle)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn poll_job(app: &Router, job_id: &str) -> Value {
    for _ in 0..200 {
        let (status, body) = send(app, get(&format!("/jobs/{}", job_id))).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "pending" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} stayed pending", job_id);
}

#[tokio::test]
async fn test_health() {
    let (app, _handle) = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_submit_and_poll_stub_scenario() {
    let (app, _handle) = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/transcripts",
            json!({"content": "Buy milk\nCall Bob\nFinish report"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    let job_id = body["jobId"].as_str().unwrap().to_string();
    let transcript_id = body["transcriptId"].as_str().unwrap().to_string();

    let job = poll_job(&app, &job_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["id"], job_id.as_str());
    assert_eq!(job["transcript_id"], transcript_id.as_str());
    assert_eq!(job["result"]["cycles"], json!([]));

    let tasks = job["result"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["id"], "t1");
    assert_eq!(tasks[0]["dependencies"], json!([]));
    assert_eq!(tasks[1]["dependencies"], json!(["t1"]));
    assert_eq!(tasks[2]["dependencies"], json!(["t2"]));
    for task in tasks {
        assert_eq!(task["status"], "ready");
    }
    assert_eq!(tasks[0]["priority"], "medium");
    assert_eq!(tasks[1]["priority"], "low");

    let (status, transcript) = send(&app, get(&format!("/transcripts/{}", transcript_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transcript["id"], transcript_id.as_str());
    assert_eq!(transcript["content"], "Buy milk\nCall Bob\nFinish report");
    assert!(transcript["created_at"].is_string());
    assert_eq!(transcript["tasks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_duplicate_submission_returns_cached_job() {
    let (app, _handle) = test_app();

    let (_, first) = send(&app, post_json("/transcripts", json!({"content": "Retro notes"}))).await;
    let job_id = first["jobId"].as_str().unwrap().to_string();
    poll_job(&app, &job_id).await;

    let (status, second) = send(
        &app,
        post_json("/transcripts", json!({"content": "  Retro notes  "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(second["jobId"], job_id.as_str());
    assert_eq!(second["transcriptId"], first["transcriptId"]);
}

#[tokio::test]
async fn test_empty_content_is_bad_request() {
    let (app, _handle) = test_app();

    for body in [json!({"content": ""}), json!({"content": "   \n"}), json!({})] {
        let (status, response) = send(&app, post_json("/transcripts", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"detail": "Transcript content is empty"}));
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _handle) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/transcripts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let (app, _handle) = test_app();

    let (status, body) = send(&app, get(&format!("/jobs/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Job not found"}));

    let (status, body) = send(&app, get("/jobs/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Job not found"}));
}

#[tokio::test]
async fn test_unknown_transcript_is_not_found() {
    let (app, _handle) = test_app();

    let (status, body) = send(&app, get(&format!("/transcripts/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Transcript not found"}));

    let (status, body) = send(&app, get("/transcripts/12345")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Transcript not found"}));
}

#[tokio::test]
async fn test_request_id_is_set() {
    let (app, _handle) = test_app();

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert!(Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_submission_after_worker_stop_is_server_error() {
    let (app, handle) = test_app();
    handle.shutdown().await.unwrap();
    handle.join().await.unwrap();

    let (status, body) = send(&app, post_json("/transcripts", json!({"content": "late"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "Job queue is closed"}));
}
