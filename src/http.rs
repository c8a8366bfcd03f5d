use crate::models::{AskRequest, AskResponse, TrendsResponse};
use crate::service::ResponseService;
use crate::trends::TrendClient;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_macros::debug_handler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ResponseService>,
    pub trends: Arc<TrendClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(handle_ask))
        .route("/trends", get(handle_trends))
        .with_state(state)
}

#[debug_handler]
async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Json<AskResponse> {
    let message = state.service.respond(&request.question).await;
    tracing::info!("Answered /ask: {}", message);

    Json(AskResponse {
        message,
        status: "Success".to_string(),
    })
}

#[debug_handler]
async fn handle_trends(State(state): State<AppState>) -> Json<TrendsResponse> {
    Json(TrendsResponse {
        trends: state.trends.fetch_crypto_trends().await,
    })
}
