use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use scraper::{Html, Selector};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> anyhow::Result<String>;
}

#[async_trait]
pub trait Renderer: Send + Sync {
    // `wait_for` is the selector that marks the page as fully loaded.
    async fn render(&self, url: &Url, wait_for: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, concat!("duscrape/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, HTML_ACCEPT)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("read body: {url}"))
    }
}

// Plain-fetch renderer for pages whose markup is served inline rather than
// assembled in the browser.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    fetcher: HttpFetcher,
}

impl HttpRenderer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new()?,
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &Url, wait_for: &str) -> anyhow::Result<String> {
        let html = self.fetcher.get(url).await?;
        if !marker_present(&html, wait_for) {
            tracing::warn!(%url, wait_for, "readiness marker not found in fetched markup");
        }
        Ok(html)
    }
}

fn marker_present(html: &str, marker: &str) -> bool {
    let Ok(selector) = Selector::parse(marker) else {
        return false;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}
