//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use super::handlers;
use super::models::{CourseRequest, ReadingRequest};
use crate::config::Config;
use crate::llm::LLM;
use crate::reading::ReadingContentFinder;
use crate::youtube::VideoSearch;

/// Shared application state: the external API clients, constructed once at
/// startup and injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LLM>,
    pub video_search: Arc<dyn VideoSearch>,
    pub reading: Arc<ReadingContentFinder>,
    pub config: Arc<Config>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(state: AppState, host: &str, port: u16) -> Result<()> {
    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/generate-course", post(generate_course_handler))
        .route("/reading-content", post(reading_content_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("🌐 API server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    match handlers::health_check().await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Course generation handler: the single primary operation
async fn generate_course_handler(
    State(state): State<AppState>,
    Json(request): Json<CourseRequest>,
) -> impl IntoResponse {
    match handlers::generate_course(
        state.llm.as_ref(),
        state.video_search.as_ref(),
        &request.topic,
        state.config.youtube.max_results,
    )
    .await
    {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            error!("Course generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Reading-content handler: best-effort, always 200
async fn reading_content_handler(
    State(state): State<AppState>,
    Json(request): Json<ReadingRequest>,
) -> impl IntoResponse {
    let data = handlers::fetch_reading(state.reading.as_ref(), &request.query).await;
    (StatusCode::OK, Json(data)).into_response()
}
