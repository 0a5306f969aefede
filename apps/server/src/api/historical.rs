use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;
use yfproxy_core::market_data::HistoricalResponse;
use yfproxy_market_data::{HistoryRange, Interval};

use super::validation::validate_symbol;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct HistoryQuery {
    start: Option<String>,
    end: Option<String>,
    interval: Option<String>,
}

fn parse_date(name: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("Invalid {} date '{}', expected YYYY-MM-DD", name, raw))
    })
}

/// Defaults: `end` today, `start` one year before `end`, daily bars.
fn resolve_range(q: &HistoryQuery, today: NaiveDate) -> ApiResult<HistoryRange> {
    let end = match q.end.as_deref() {
        Some(raw) => parse_date("end", raw)?,
        None => today,
    };
    let start = match q.start.as_deref() {
        Some(raw) => parse_date("start", raw)?,
        None => end.checked_sub_months(Months::new(12)).unwrap_or(end),
    };
    let interval = match q.interval.as_deref() {
        Some(raw) => raw.trim().parse::<Interval>()?,
        None => Interval::default(),
    };
    Ok(HistoryRange::new(start, end, interval)?)
}

async fn get_historical(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<HistoricalResponse>> {
    let symbol = validate_symbol(&symbol)?;
    let range = resolve_range(&q, Utc::now().date_naive())?;
    let history = state.market_data.get_history(&symbol, &range).await?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/historical/{symbol}", get(get_historical))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: Option<&str>, end: Option<&str>, interval: Option<&str>) -> HistoryQuery {
        HistoryQuery {
            start: start.map(String::from),
            end: end.map(String::from),
            interval: interval.map(String::from),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_defaults_to_one_year_of_daily_bars() {
        let range = resolve_range(&query(None, None, None), day("2024-03-15")).unwrap();
        assert_eq!(range.start, day("2023-03-15"));
        assert_eq!(range.end, day("2024-03-15"));
        assert_eq!(range.interval, Interval::OneDay);
    }

    #[test]
    fn test_explicit_range_and_interval() {
        let range = resolve_range(
            &query(Some("2024-01-01"), Some("2024-02-01"), Some("1wk")),
            day("2024-03-15"),
        )
        .unwrap();
        assert_eq!(range.start, day("2024-01-01"));
        assert_eq!(range.interval, Interval::OneWeek);
    }

    #[test]
    fn test_rejects_bad_input() {
        let today = day("2024-03-15");
        assert!(resolve_range(&query(None, None, Some("5m")), today).is_err());
        assert!(resolve_range(&query(Some("2024-13-01"), None, None), today).is_err());
        assert!(resolve_range(&query(Some("2024-02-01"), Some("2024-01-01"), None), today).is_err());
    }
}
