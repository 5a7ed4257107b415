use axum::Json;
use axum::extract::State;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::engine::ApyReport;

pub async fn get_apy(State(state): State<AppState>) -> Result<Json<ApyReport>, ApiError> {
    match state.engine.apy_report().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "expected yield computation failed");
            Err(e.into())
        }
    }
}
