//! Market data models
//!
//! This module contains the provider-agnostic data types:
//! - `quote` - Latest quote (Quote)
//! - `profile` - Company/asset profile (AssetProfile)
//! - `history` - OHLCV bars and the range/interval that selects them
//! - `earnings` - Earnings rows and reporting frequency
//! - `split` - Stock split events
//! - `news` - News articles and the stream they come from

mod earnings;
mod history;
mod news;
mod profile;
mod quote;
mod split;

pub use earnings::{EarningsFrequency, EarningsReport, EarningsRow};
pub use history::{HistoricalBar, HistoryRange, Interval};
pub use news::{
    NewsArticle, NewsContent, NewsImage, NewsLink, NewsProvider, NewsTab, NewsThumbnail,
};
pub use profile::AssetProfile;
pub use quote::Quote;
pub use split::StockSplit;
