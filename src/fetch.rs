use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::HttpConfig;

const ERROR_PREVIEW_CHARS: usize = 180;

/// Source of raw page bodies. The scrapers only ever see text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed GET request: {url}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {url}"))?;
        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_PREVIEW_CHARS).collect();
            return Err(anyhow!("GET {url} returned {status}: {preview}"));
        }
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::PageFetcher;

    #[tokio::test]
    async fn static_fetcher_serves_known_pages() {
        let fetcher = StaticFetcher::new().with_page("https://a.test/", "<p>hi</p>");
        let body = fetcher.fetch_text("https://a.test/").await.expect("page");
        assert_eq!(body, "<p>hi</p>");
        let err = fetcher.fetch_text("https://a.test/missing").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn fetch_json_parses_body() {
        let fetcher = StaticFetcher::new().with_page(
            "https://a.test/geo.json",
            r#"{"type":"FeatureCollection","features":[]}"#,
        );
        let value = fetcher
            .fetch_json("https://a.test/geo.json")
            .await
            .expect("json");
        assert_eq!(value["type"], "FeatureCollection");

        let bad = StaticFetcher::new().with_page("https://a.test/bad", "not json");
        assert!(bad.fetch_json("https://a.test/bad").await.is_err());
    }
}
