use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use yfproxy_market_data::StockSplit;

use super::validation::validate_symbol;
use crate::{error::ApiResult, main_lib::AppState};

async fn get_splits(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Vec<StockSplit>>> {
    let symbol = validate_symbol(&symbol)?;
    let splits = state.market_data.get_splits(&symbol).await?;
    Ok(Json(splits))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/splits/{symbol}", get(get_splits))
}
