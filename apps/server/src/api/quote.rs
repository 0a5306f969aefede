use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use yfproxy_core::market_data::QuoteResponse;

use super::validation::{parse_symbol_list, validate_symbol};
use crate::{
    error::{status_for, ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct BulkQuoteQuery {
    symbols: Option<String>,
}

/// One slot of a bulk response: the quote, or why this symbol failed.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BulkQuoteEntry {
    Quote(QuoteResponse),
    Error { error: String, status_code: u16 },
}

/// Serialized as a JSON object whose keys follow request order.
#[derive(Debug)]
pub struct BulkQuoteResponse(Vec<(String, BulkQuoteEntry)>);

impl Serialize for BulkQuoteResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (symbol, entry) in &self.0 {
            map.serialize_entry(symbol, entry)?;
        }
        map.end()
    }
}

async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<QuoteResponse>> {
    let symbol = validate_symbol(&symbol)?;
    let quote = state.market_data.get_quote(&symbol).await?;
    Ok(Json(quote))
}

async fn get_bulk_quotes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<BulkQuoteQuery>,
) -> ApiResult<Json<BulkQuoteResponse>> {
    let raw = q
        .symbols
        .ok_or_else(|| ApiError::BadRequest("Query parameter 'symbols' is required".to_string()))?;
    let symbols = parse_symbol_list(&raw, state.max_bulk_symbols)?;

    let results = state.market_data.get_quotes(&symbols).await;
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        tracing::debug!("Bulk quote: {} of {} symbols failed", failed, results.len());
    }

    let entries = results
        .into_iter()
        .map(|(symbol, result)| {
            let entry = match result {
                Ok(quote) => BulkQuoteEntry::Quote(quote),
                Err(e) => BulkQuoteEntry::Error {
                    status_code: status_for(&e).as_u16(),
                    error: e.to_string(),
                },
            };
            (symbol, entry)
        })
        .collect();
    Ok(Json(BulkQuoteResponse(entries)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quote", get(get_bulk_quotes))
        .route("/quote/{symbol}", get(get_quote))
}
