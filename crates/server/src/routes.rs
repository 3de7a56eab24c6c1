use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_core::api::{AskRequest, AskResponse, HealthBody, ASK_PATH, HEALTH_PATH};
use relay_core::completion::CompletionService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::AskError;

pub fn router(service: Arc<CompletionService>, cors: CorsLayer) -> Router {
    Router::new()
        .route(ASK_PATH, post(ask))
        .route(HEALTH_PATH, get(health))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn ask(
    State(service): State<Arc<CompletionService>>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AskError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(target: "server", "ask: unreadable body: {}", rejection.body_text());
            return Err(AskError::Validation);
        }
    };
    let prompt = req.prompt().ok_or(AskError::Validation)?;
    info!(target: "server", "ask: prompt_len={}", prompt.len());
    let answer = service.complete(prompt).await?;
    Ok(Json(AskResponse::answered(answer)))
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody::ok())
}
