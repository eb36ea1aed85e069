use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::ErrorCode;
use crate::pipeline::{Orchestrator, PredictionReport};

/// Largest accepted upload body
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    orchestrator: Arc<Orchestrator>,
    /// Held for the whole of each prediction
    serial: Arc<Mutex<()>>,
}

impl HttpState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            serial: Arc::new(Mutex::new(())),
        }
    }
}

/// Query payload naming the uploaded file.
#[derive(Debug, Default, Deserialize)]
pub struct PredictQuery {
    pub filename: Option<String>,
}

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    BadRequest(&'static str),
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub gate_threshold_hz: f32,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Run the HTTP server loop.
pub async fn run_http_server(state: HttpState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding upload HTTP listener")?;
    log::info!("[Http] Listening on {}", addr);
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .context("serving upload HTTP router")?;
    Ok(())
}

pub async fn health(State(state): State<HttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        gate_threshold_hz: state.orchestrator.context().gate().threshold_hz(),
    })
}

pub async fn predict(
    State(state): State<HttpState>,
    Query(query): Query<PredictQuery>,
    body: Bytes,
) -> Result<Json<PredictionReport>, HttpServerError> {
    let filename = query
        .filename
        .filter(|name| !name.trim().is_empty())
        .ok_or(HttpServerError::BadRequest("missing filename query parameter"))?;
    if body.is_empty() {
        return Err(HttpServerError::BadRequest("empty upload"));
    }

    let _serial = state.serial.lock().await;
    let orchestrator = Arc::clone(&state.orchestrator);

    let report = tokio::task::spawn_blocking(move || orchestrator.predict_upload(&filename, &body))
        .await
        .map_err(|err| HttpServerError::Internal(format!("prediction task failed: {}", err)))?
        .map_err(|err| HttpServerError::Internal(err.message()))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SAMPLE_RATE;
    use crate::config::AppConfig;
    use crate::context::AppContext;
    use crate::testing::{self, ScriptedModel};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn make_router(upload_dir: &std::path::Path) -> Router {
        let mut config = AppConfig::default();
        config.upload.temp_dir = upload_dir.to_path_buf();
        let context = AppContext::from_models(
            config,
            Box::new(ScriptedModel::new("age", 8, 6)),
            Box::new(ScriptedModel::new("emotion", 7, 3)),
        )
        .unwrap();
        build_router(HttpState::new(Orchestrator::new(context)))
    }

    async fn response_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body bytes");
        let json = serde_json::from_slice::<Value>(&bytes).expect("JSON body");
        (status, json)
    }

    fn silent_wav_bytes() -> Vec<u8> {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("silence.wav");
        testing::write_wav(&path, &testing::silence(1.0, SAMPLE_RATE)).expect("write wav");
        std::fs::read(&path).expect("read wav")
    }

    #[tokio::test]
    async fn health_reports_threshold() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (status, json) = response_json(
            make_router(dir.path())
                .oneshot(
                    Request::builder()
                        .uri("/health")
                        .body(Body::empty())
                        .expect("health request"),
                )
                .await
                .expect("health call"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["gate_threshold_hz"], 200.0);
    }

    #[tokio::test]
    async fn predict_returns_both_results() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (status, json) = response_json(
            make_router(dir.path())
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/predict?filename=silence.wav")
                        .body(Body::from(silent_wav_bytes()))
                        .expect("predict request"),
                )
                .await
                .expect("predict call"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["file"], "silence.wav");
        assert_eq!(
            json["age_result"],
            "Predicted age group: seventies (Senior Citizen)"
        );
        assert_eq!(json["emotion_result"], "Predicted emotion: happy");
        assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 0);
    }

    #[tokio::test]
    async fn predict_requires_filename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (status, json) = response_json(
            make_router(dir.path())
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/predict")
                        .body(Body::from(vec![1u8, 2, 3]))
                        .expect("predict request"),
                )
                .await
                .expect("predict call"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing filename query parameter");
    }

    #[tokio::test]
    async fn predict_rejects_empty_body() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (status, json) = response_json(
            make_router(dir.path())
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/predict?filename=voice.mp3")
                        .body(Body::empty())
                        .expect("predict request"),
                )
                .await
                .expect("predict call"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "empty upload");
    }
}
