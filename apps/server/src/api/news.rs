use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use yfproxy_core::market_data::NewsResponse;
use yfproxy_market_data::NewsTab;

use super::validation::validate_symbol;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const DEFAULT_COUNT: usize = 10;

#[derive(Deserialize)]
struct NewsQuery {
    tab: Option<String>,
    count: Option<String>,
}

/// `count` must lie in `1..=max`. Absent means [`DEFAULT_COUNT`], capped at `max`.
fn parse_count(raw: Option<&str>, max: usize) -> ApiResult<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_COUNT.min(max));
    };
    match raw.trim().parse::<usize>() {
        Ok(count) if (1..=max).contains(&count) => Ok(count),
        _ => Err(ApiError::Unprocessable(format!(
            "Invalid count '{}': expected an integer between 1 and {}",
            raw, max
        ))),
    }
}

async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(q): Query<NewsQuery>,
) -> ApiResult<Json<NewsResponse>> {
    let symbol = validate_symbol(&symbol)?;
    let tab = match q.tab.as_deref() {
        Some(raw) => raw
            .parse::<NewsTab>()
            .map_err(|e| ApiError::Unprocessable(e.to_string()))?,
        None => NewsTab::default(),
    };
    let count = parse_count(q.count.as_deref(), state.news_max_items)?;
    let news = state.market_data.get_news(&symbol, tab, count).await?;
    Ok(Json(news))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/news/{symbol}", get(get_news))
}
