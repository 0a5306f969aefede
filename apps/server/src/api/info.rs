use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use yfproxy_core::market_data::InfoResponse;

use super::validation::validate_symbol;
use crate::{error::ApiResult, main_lib::AppState};

async fn get_info(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<InfoResponse>> {
    let symbol = validate_symbol(&symbol)?;
    let info = state.market_data.get_info(&symbol).await?;
    Ok(Json(info))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/info/{symbol}", get(get_info))
}
