use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::clients::traits::NewsSource;
use crate::clients::truncate_body;
use crate::config::NewsConfig;
use crate::news::Article;

/// NewsAPI `/everything` client.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    cfg: NewsConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    url_to_image: Option<String>,
    source: Option<RawSource>,
    published_at: Option<String>,
    author: Option<String>,
}

#[derive(Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Article {
            title: raw.title,
            description: raw.description,
            url: raw.url.unwrap_or_else(|| "#".to_string()),
            image_url: raw.url_to_image,
            source_name: raw.source.and_then(|s| s.name),
            published_at: raw.published_at,
            author: raw.author,
        }
    }
}

impl NewsApiClient {
    pub fn new(api_key: Option<String>, cfg: &NewsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("Failed to build reqwest client with timeout")?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            cfg: cfg.clone(),
        })
    }

    async fn try_fetch(&self) -> Result<Vec<Article>> {
        let api_key = self
            .api_key
            .as_deref()
            .context("NEWS_API_KEY is not configured")?;
        let url = format!("{}/everything", self.cfg.base_url.trim_end_matches('/'));
        let page_size = self.cfg.page_size.to_string();

        debug!(
            "Fetching news (page_size={}, language={})",
            self.cfg.page_size, self.cfg.language
        );

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", api_key)
            .query(&[
                ("q", self.cfg.query.as_str()),
                ("sortBy", self.cfg.sort_by.as_str()),
                ("language", self.cfg.language.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to news API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read news API response")?;
        parse_everything(status.as_u16(), &body)
    }
}

fn parse_everything(status: u16, body: &str) -> Result<Vec<Article>> {
    let parsed: EverythingResponse = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) if (200..300).contains(&status) => {
            return Err(e).context("Failed to parse news API response");
        }
        Err(_) => anyhow::bail!("News API error {}: {}", status, truncate_body(body)),
    };
    if parsed.status != "ok" {
        anyhow::bail!(
            "News API error {}: {}",
            status,
            parsed.message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(parsed.articles.into_iter().map(Article::from).collect())
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch(&self) -> Vec<Article> {
        match self.try_fetch().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Error fetching news: {:#}", e);
                vec![Article::fetch_failed(format!("{:#}", e))]
            }
        }
    }
}
