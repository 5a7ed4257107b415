use axum::Json;
use axum::extract::{Query, State};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::BacktestQuery;
use crate::backtest::check_days;
use crate::backtest::result::BacktestResult;

pub async fn run_backtest(
    State(state): State<AppState>,
    Query(query): Query<BacktestQuery>,
) -> Result<Json<BacktestResult>, ApiError> {
    let days = query.days.unwrap_or(state.engine.config.benchmark.days);
    let days = check_days(days).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let result = state.engine.backtest(days).await.map_err(|e| {
        tracing::error!(error = %format!("{e:#}"), "backtest failed");
        ApiError::from(e)
    })?;
    Ok(Json(result))
}
