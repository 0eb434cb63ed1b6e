//! Prometheus metrics
//!
//! Counters for assessment turns, stage transitions, and fallback replies,
//! exported on `/metrics`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use career_guide_agent::StageTransition;
use career_guide_core::AssessmentStage;

use crate::state::AppState;
use crate::ServerError;

/// Install the global Prometheus recorder.
///
/// Can only succeed once per process.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    metrics::describe_counter!("career_guide_exchanges_total", "Assessment turns processed");
    metrics::describe_counter!(
        "career_guide_stage_transitions_total",
        "Stage advances by reason"
    );
    metrics::describe_counter!(
        "career_guide_fallback_replies_total",
        "Turns answered with the fallback message"
    );
    metrics::describe_gauge!("career_guide_active_sessions", "Live sessions");

    Ok(handle)
}

/// Count one processed turn at the stage it was answered in
pub fn record_exchange(stage: AssessmentStage) {
    metrics::counter!(
        "career_guide_exchanges_total",
        "stage" => stage.number().to_string()
    )
    .increment(1);
}

pub fn record_transition(transition: &StageTransition) {
    metrics::counter!(
        "career_guide_stage_transitions_total",
        "from" => transition.from.number().to_string(),
        "to" => transition.to.number().to_string(),
        "reason" => transition.reason.label()
    )
    .increment(1);
}

pub fn record_fallback(endpoint: &'static str) {
    metrics::counter!("career_guide_fallback_replies_total", "endpoint" => endpoint).increment(1);
}

pub fn record_session_count(count: usize) {
    metrics::gauge!("career_guide_active_sessions").set(count as f64);
}

/// Render metrics in Prometheus text format
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
