//! Climate news records and the paged view over them.

use std::collections::HashMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub const NO_IMAGE_THUMBNAIL: &str = "https://via.placeholder.com/100x100.png?text=No+Image";
pub const FETCH_FAILED_TITLE: &str = "News fetch failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source_name: Option<String>,
    /// ISO-8601 timestamp as reported by the news backend.
    pub published_at: Option<String>,
    pub author: Option<String>,
}

impl Article {
    /// The single record returned in place of a list when fetching fails.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self {
            title: Some(FETCH_FAILED_TITLE.to_string()),
            description: Some(message.into()),
            url: "#".to_string(),
            image_url: None,
            source_name: None,
            published_at: None,
            author: None,
        }
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("No Title")
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or("No description available.")
    }

    /// `YYYY-MM-DD`, or whatever leading date text the backend sent.
    pub fn published_date(&self) -> String {
        let Some(raw) = self.published_at.as_deref() else {
            return String::new();
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts.format("%Y-%m-%d").to_string(),
            Err(_) => raw.chars().take(10).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    pub source: String,
    pub date: String,
    pub author: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsPage {
    pub articles: Vec<ArticleView>,
    pub showing: usize,
    pub total: usize,
    pub has_more: bool,
}

/// The first `visible` articles, with any cached summaries attached.
pub fn build_page(
    articles: &[Article],
    visible: usize,
    summaries: &HashMap<usize, String>,
) -> NewsPage {
    let showing = visible.min(articles.len());
    let views = articles
        .iter()
        .take(showing)
        .enumerate()
        .map(|(index, a)| ArticleView {
            index,
            title: a.title_or_default().to_string(),
            description: a.description_or_default().to_string(),
            url: a.url.clone(),
            thumbnail: a
                .image_url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| NO_IMAGE_THUMBNAIL.to_string()),
            source: a
                .source_name
                .clone()
                .unwrap_or_else(|| "Unknown Source".to_string()),
            date: a.published_date(),
            author: a.author.clone(),
            summary: summaries.get(&index).cloned(),
        })
        .collect();

    NewsPage {
        articles: views,
        showing,
        total: articles.len(),
        has_more: visible < articles.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: usize) -> Article {
        Article {
            title: Some(format!("Story {n}")),
            description: None,
            url: format!("https://example.org/{n}"),
            image_url: None,
            source_name: Some("Example Times".into()),
            published_at: Some("2024-05-06T07:08:09Z".into()),
            author: None,
        }
    }

    #[test]
    fn test_fetch_failed_placeholder() {
        let a = Article::fetch_failed("connection refused");
        assert_eq!(a.title_or_default(), FETCH_FAILED_TITLE);
        assert_eq!(a.description_or_default(), "connection refused");
        assert_eq!(a.url, "#");
    }

    #[test]
    fn test_published_date() {
        assert_eq!(article(0).published_date(), "2024-05-06");
        let mut a = article(0);
        a.published_at = Some("2024-05-06 sometime".into());
        assert_eq!(a.published_date(), "2024-05-06");
        a.published_at = None;
        assert_eq!(a.published_date(), "");
    }

    #[test]
    fn test_page_limits_and_defaults() {
        let articles: Vec<_> = (0..7).map(article).collect();
        let mut summaries = HashMap::new();
        summaries.insert(1, "- short".to_string());

        let page = build_page(&articles, 5, &summaries);
        assert_eq!(page.showing, 5);
        assert_eq!(page.total, 7);
        assert!(page.has_more);
        assert_eq!(page.articles[0].thumbnail, NO_IMAGE_THUMBNAIL);
        assert_eq!(page.articles[0].description, "No description available.");
        assert_eq!(page.articles[1].summary.as_deref(), Some("- short"));

        let page = build_page(&articles, 10, &summaries);
        assert_eq!(page.showing, 7);
        assert!(!page.has_more);
    }
}
