use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Which news stream to read for a symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewsTab {
    #[default]
    News,
    PressReleases,
    All,
}

impl NewsTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsTab::News => "news",
            NewsTab::PressReleases => "press-releases",
            NewsTab::All => "all",
        }
    }
}

impl fmt::Display for NewsTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsTab {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(NewsTab::News),
            "press-releases" => Ok(NewsTab::PressReleases),
            "all" => Ok(NewsTab::All),
            other => Err(MarketDataError::ValidationFailed {
                message: format!(
                    "Unsupported tab '{}'. Allowed: news, press-releases, all",
                    other
                ),
            }),
        }
    }
}

/// One article from a symbol's news stream.
///
/// Field names follow the upstream's camelCase payload, which is also what
/// the HTTP layer serves. Unknown fields are dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub content: NewsContent,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsContent {
    pub id: Option<String>,
    /// `STORY`, `VIDEO`, ...
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    /// RFC 3339, as sent by the upstream.
    pub pub_date: Option<String>,
    pub display_time: Option<String>,
    pub is_hosted: Option<bool>,
    pub preview_url: Option<String>,
    pub thumbnail: Option<NewsThumbnail>,
    pub provider: Option<NewsProvider>,
    pub canonical_url: Option<NewsLink>,
    pub click_through_url: Option<NewsLink>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsThumbnail {
    pub original_url: Option<String>,
    pub original_width: Option<u32>,
    pub original_height: Option<u32>,
    pub caption: Option<String>,
    pub resolutions: Option<Vec<NewsImage>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsImage {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// `original` or a `WxH` size.
    pub tag: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsProvider {
    pub display_name: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsLink {
    pub url: Option<String>,
    pub site: Option<String>,
    pub region: Option<String>,
    pub lang: Option<String>,
}
