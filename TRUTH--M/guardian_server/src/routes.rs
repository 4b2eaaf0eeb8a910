use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use truth_factcheck::{config::ServerSettings, AnalysisError, FactCheckRuntime, Verdict};

const TARGET: &str = "truth-guardian";

// --- Error Handling ---
pub enum AppError {
    Analysis(AnalysisError),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        Self::Analysis(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Analysis(AnalysisError::EmptyClaim) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": AnalysisError::EmptyClaim.to_string() })),
            )
                .into_response(),
            Self::Analysis(AnalysisError::Internal(err)) => {
                tracing::error!(target: TARGET, "analysis failed: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Verdict::error(&err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

// --- Handlers ---
#[derive(Clone)]
pub struct AppState {
    runtime: Arc<FactCheckRuntime>,
}

impl AppState {
    pub fn new(runtime: FactCheckRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Verdict>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(target: TARGET, "rejected analyze body: {}", rejection.body_text());
        AppError::from(AnalysisError::EmptyClaim)
    })?;
    let text = request.text.unwrap_or_default();

    // Panics inside the pipeline surface as a JoinError instead of dropping the connection.
    let runtime = Arc::clone(&state.runtime);
    let verdict = tokio::spawn(async move { runtime.analyze(&text).await })
        .await
        .map_err(|err| AnalysisError::Internal(anyhow!("analysis task aborted: {err}")))??;

    tracing::debug!(
        target: TARGET,
        label = %verdict.label,
        confidence = verdict.confidence,
        "analyze_handler: verdict ready"
    );
    Ok(Json(verdict))
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// --- Server ---
pub fn router(state: AppState, body_limit_kb: usize) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit_kb * 1024))
}

pub async fn run_server(
    settings: &ServerSettings,
    runtime: FactCheckRuntime,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(AppState::new(runtime), settings.body_limit_kb);

    let addr: SocketAddr = settings
        .listen_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", settings.listen_addr()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(target: TARGET, "Truth Guardian listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")
}
