//! News search collaborator
//!
//! Provides:
//! - `NewsSource` trait for feed-based full-text search
//! - Google News RSS client
//! - Per-lead multi-query aggregation with deduplication

pub mod aggregator;
pub mod rss;

pub use aggregator::{dedup_articles, lead_queries, NewsAggregator};

use crate::config::NewsConfig;
use crate::errors::{AppError, Result};
use crate::models::NewsArticle;
use async_trait::async_trait;

/// Trait for searching a news feed
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Return at most `limit` articles for `query`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>>;
}

/// Google News RSS search client
pub struct GoogleNewsClient {
    client: reqwest::Client,
    config: NewsConfig,
}

impl GoogleNewsClient {
    /// Create a new client
    pub fn new(config: NewsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Build the search URL for a query; the query is percent-encoded
    pub fn search_url(&self, query: &str) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("q", query),
                ("hl", self.config.language.as_str()),
                ("gl", self.config.country.as_str()),
                ("ceid", self.config.edition.as_str()),
            ],
        )
        .map_err(|e| AppError::Configuration {
            message: format!("Invalid news endpoint: {}", e),
        })
    }
}

#[async_trait]
impl NewsSource for GoogleNewsClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let url = self.search_url(query)?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::NewsFeed {
                message: format!("Feed returned {}", response.status()),
            });
        }

        let body = response.text().await?;
        rss::parse_items(&body, limit)
    }
}
