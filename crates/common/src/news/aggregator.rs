//! Per-lead news aggregation
//!
//! A single query under-covers either the person or the company, so each lead
//! fans out into four fixed queries. Results are merged in query order,
//! deduplicated and truncated.

use super::NewsSource;
use crate::config::NewsConfig;
use crate::metrics;
use crate::models::NewsArticle;
use futures::future::join_all;
use std::sync::Arc;
use tracing::instrument;

/// The four sub-queries for a lead, in merge order
pub fn lead_queries(name: &str, org: &str) -> [String; 4] {
    [
        format!("{} {}", name, org),
        format!("{} news", org),
        format!("{} executive", name),
        format!("{} marketing", org),
    ]
}

/// Drop every article whose title or link equals that of any earlier article.
///
/// Comparison runs against the full input prefix, not only the survivors, so
/// the result is stable under repeated application.
pub fn dedup_articles(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let keep: Vec<bool> = articles
        .iter()
        .enumerate()
        .map(|(i, article)| !articles[..i].iter().any(|earlier| article.is_duplicate_of(earlier)))
        .collect();

    articles
        .into_iter()
        .zip(keep)
        .filter_map(|(article, keep)| keep.then_some(article))
        .collect()
}

/// Fans lead lookups out to a news source
#[derive(Clone)]
pub struct NewsAggregator {
    source: Arc<dyn NewsSource>,
    per_query_limit: usize,
    max_articles: usize,
}

impl NewsAggregator {
    pub fn new(source: Arc<dyn NewsSource>, config: &NewsConfig) -> Self {
        Self {
            source,
            per_query_limit: config.per_query_limit,
            max_articles: config.max_articles,
        }
    }

    /// Single best-effort query. Failures are logged and yield no articles.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<NewsArticle> {
        match self.source.search(query, limit).await {
            Ok(mut articles) => {
                articles.truncate(limit);
                metrics::record_news_query(true, articles.len());
                articles
            }
            Err(e) => {
                metrics::record_news_query(false, 0);
                tracing::warn!(query = %query, error = %e, "Error fetching news for query");
                Vec::new()
            }
        }
    }

    /// Recent articles about a lead and their organization. Never fails.
    #[instrument(skip(self))]
    pub async fn for_lead(&self, name: &str, org: &str) -> Vec<NewsArticle> {
        let queries = lead_queries(name, org);

        // join_all yields results in input order regardless of completion order
        let batches = join_all(
            queries
                .iter()
                .map(|query| self.search(query, self.per_query_limit)),
        )
        .await;

        let merged: Vec<NewsArticle> = batches.into_iter().flatten().collect();
        let total = merged.len();

        let mut articles = dedup_articles(merged);
        articles.truncate(self.max_articles);

        tracing::info!(
            lead = %name,
            fetched = total,
            returned = articles.len(),
            "News aggregated"
        );
        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    fn article(title: &str, link: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            link: link.to_string(),
            pub_date: String::new(),
            content: String::new(),
            source: "Test".to_string(),
        }
    }

    /// Records every call and returns `per_query` distinct articles per query.
    /// Queries listed in `failing` error out; earlier queries sleep longer so
    /// completion order is the reverse of issue order.
    struct RecordingSource {
        calls: Mutex<Vec<(String, usize)>>,
        per_query: usize,
        failing: Vec<String>,
    }

    impl RecordingSource {
        fn new(per_query: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                per_query,
                failing: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl NewsSource for RecordingSource {
        async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
            let position = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((query.to_string(), limit));
                calls.len()
            };
            tokio::time::sleep(Duration::from_millis(40 / position as u64)).await;

            if self.failing.iter().any(|q| q == query) {
                return Err(AppError::NewsFeed {
                    message: "feed down".into(),
                });
            }

            Ok((0..self.per_query)
                .map(|i| article(&format!("{} #{}", query, i), &format!("https://n/{}/{}", query, i)))
                .collect())
        }
    }

    fn aggregator(source: Arc<dyn NewsSource>) -> NewsAggregator {
        NewsAggregator::new(source, &NewsConfig::default())
    }

    #[test]
    fn test_lead_queries_order() {
        assert_eq!(
            lead_queries("Jane Doe", "Acme"),
            [
                "Jane Doe Acme".to_string(),
                "Acme news".to_string(),
                "Jane Doe executive".to_string(),
                "Acme marketing".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_for_lead_issues_four_queries_with_limit() {
        let source = Arc::new(RecordingSource::new(1));
        let articles = aggregator(source.clone()).for_lead("Jane Doe", "Acme").await;

        // join_all polls in input order, so calls are issued in query order
        let calls = source.calls.lock().unwrap().clone();
        let expected: Vec<(String, usize)> = lead_queries("Jane Doe", "Acme")
            .into_iter()
            .map(|q| (q, 3))
            .collect();
        assert_eq!(calls, expected);

        // Merge order follows query order, not completion order
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Jane Doe Acme #0",
                "Acme news #0",
                "Jane Doe executive #0",
                "Acme marketing #0",
            ]
        );
    }

    #[tokio::test]
    async fn test_for_lead_truncates_to_five() {
        let source = Arc::new(RecordingSource::new(3));
        let articles = aggregator(source).for_lead("Jane Doe", "Acme").await;
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].title, "Jane Doe Acme #0");
        assert_eq!(articles[3].title, "Acme news #0");
    }

    #[tokio::test]
    async fn test_failing_query_is_isolated() {
        let mut source = RecordingSource::new(1);
        source.failing = vec!["Acme news".to_string()];
        let source = Arc::new(source);

        let articles = aggregator(source.clone()).for_lead("Jane Doe", "Acme").await;
        assert_eq!(source.calls.lock().unwrap().len(), 4);
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Jane Doe Acme #0", "Jane Doe executive #0", "Acme marketing #0"]
        );
    }

    #[tokio::test]
    async fn test_all_queries_failing_yields_empty() {
        let mut source = RecordingSource::new(2);
        source.failing = lead_queries("Jane", "Acme").to_vec();
        let articles = aggregator(Arc::new(source)).for_lead("Jane", "Acme").await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_search_swallows_errors() {
        let mut source = RecordingSource::new(2);
        source.failing = vec!["broken".to_string()];
        let aggregator = aggregator(Arc::new(source));
        assert!(aggregator.search("broken", 3).await.is_empty());
        assert_eq!(aggregator.search("fine", 3).await.len(), 2);
    }

    #[test]
    fn test_dedup_keeps_first_on_title_match() {
        let a = article("X", "L1");
        let b = article("X", "L2");
        assert_eq!(dedup_articles(vec![a.clone(), b]), vec![a]);
    }

    #[test]
    fn test_dedup_on_link_match() {
        let a = article("X", "L1");
        let b = article("Y", "L1");
        let c = article("Z", "L3");
        assert_eq!(dedup_articles(vec![a.clone(), b, c.clone()]), vec![a, c]);
    }

    #[test]
    fn test_dedup_compares_against_dropped_articles() {
        // B duplicates A by link; C duplicates B by title only
        let a = article("T1", "L1");
        let b = article("T2", "L1");
        let c = article("T2", "L2");
        assert_eq!(dedup_articles(vec![a.clone(), b, c]), vec![a]);
    }

    #[test]
    fn test_dedup_idempotent() {
        let input = vec![
            article("T1", "L1"),
            article("T2", "L1"),
            article("T2", "L2"),
            article("T3", "L3"),
            article("T1", "L4"),
            article("T5", "L3"),
            article("T6", "L6"),
        ];
        let once = dedup_articles(input);
        let twice = dedup_articles(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }
}
