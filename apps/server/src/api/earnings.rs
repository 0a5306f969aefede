use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use yfproxy_core::market_data::EarningsResponse;
use yfproxy_market_data::EarningsFrequency;

use super::validation::validate_symbol;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct EarningsQuery {
    frequency: Option<String>,
}

async fn get_earnings(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(q): Query<EarningsQuery>,
) -> ApiResult<Json<EarningsResponse>> {
    let symbol = validate_symbol(&symbol)?;
    let frequency = match q.frequency.as_deref() {
        Some(raw) => raw.parse::<EarningsFrequency>()?,
        None => EarningsFrequency::default(),
    };
    let earnings = state.market_data.get_earnings(&symbol, frequency).await?;
    Ok(Json(earnings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/earnings/{symbol}", get(get_earnings))
}
