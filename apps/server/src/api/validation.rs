use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use yfproxy_core::normalize_symbol;

use crate::error::{ApiError, ApiResult};

/// Ticker alphabet: letters, digits, `.`, `-` and `=` (`BRK-B`, `EURUSD=X`).
static SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.\-=]{1,20}$").expect("Invalid symbol regex"));

/// Trim, check against the allowed ticker alphabet and uppercase.
pub fn validate_symbol(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim();
    if !SYMBOL_REGEX.is_match(trimmed) {
        return Err(ApiError::Unprocessable(format!(
            "Invalid symbol '{}': expected 1-20 characters of letters, digits, '.', '-' or '='",
            trimmed
        )));
    }
    Ok(normalize_symbol(trimmed))
}

/// Parse a comma separated symbol list, keeping first-seen order and dropping duplicates.
pub fn parse_symbol_list(raw: &str, max_symbols: usize) -> ApiResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let symbol = validate_symbol(part)?;
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one symbol is required".to_string(),
        ));
    }
    if symbols.len() > max_symbols {
        return Err(ApiError::BadRequest(format!(
            "Too many symbols: {} requested, at most {} allowed",
            symbols.len(),
            max_symbols
        )));
    }
    Ok(symbols)
}
