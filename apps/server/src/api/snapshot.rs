use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use yfproxy_core::market_data::SnapshotResponse;

use super::validation::validate_symbol;
use crate::{error::ApiResult, main_lib::AppState};

/// Info and latest quote in one response; fails if either half fails.
async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<SnapshotResponse>> {
    let symbol = validate_symbol(&symbol)?;
    let snapshot = state.market_data.get_snapshot(&symbol).await?;
    Ok(Json(snapshot))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/snapshot/{symbol}", get(get_snapshot))
}
