use crate::api::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, Json};

/// ANY /
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        run_time: state.started_at.elapsed().as_secs_f64(),
    })
}
