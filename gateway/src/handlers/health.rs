//! 健康检查与指标

use axum::{Json, extract::State, http::StatusCode};
use ims_bootstrap::HealthStatus;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health.liveness())
}

/// 数据库不可达时返回 503
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.health.readiness().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}
