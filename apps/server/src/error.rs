use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use yfproxy_core::Error as CoreError;
use yfproxy_market_data::MarketDataError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        ApiError::Core(CoreError::MarketData(err))
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// HTTP status for a failed lookup. Also used for per-symbol slots in bulk responses.
pub fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::MarketData(e) => match e {
            MarketDataError::SymbolNotFound(_) | MarketDataError::NoData(_) => {
                StatusCode::NOT_FOUND
            }
            MarketDataError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
            MarketDataError::RateLimited { .. }
            | MarketDataError::Timeout { .. }
            | MarketDataError::Network(_)
            | MarketDataError::ProviderError { .. } => StatusCode::SERVICE_UNAVAILABLE,
            MarketDataError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
            MarketDataError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        },
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Aborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(e) => status_for(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
