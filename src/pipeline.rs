use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use chrono::NaiveDate;
use url::Url;

use crate::enrich::{self, DetailRule};
use crate::extract::{self, RawRecord};
use crate::fetch::{Fetcher, Renderer};
use crate::paginate::{self, MonthRange};
use crate::records::Envelope;
use crate::rules::ItemRules;
use crate::store;

pub struct Pipeline<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub entity: &'a str,
    pub rules: &'a ItemRules,
    pub detail: Option<&'a DetailRule>,
    pub target_year: i32,
    pub concurrency: usize,
    pub delay: Duration,
    pub output: PathBuf,
}

impl Pipeline<'_> {
    // The index markup needs a rendering pass before it is queryable.
    pub async fn run_rendered(
        &self,
        renderer: &dyn Renderer,
        url: &Url,
        wait_for: &str,
    ) -> anyhow::Result<usize> {
        tracing::info!(entity = self.entity, %url, "scrape: render index");
        let html = renderer
            .render(url, wait_for)
            .await
            .with_context(|| format!("render index page: {url}"))?;
        let records = extract::extract(&html, self.rules, url, self.target_year)
            .context("extract index items")?;

        self.finish(records).await
    }

    pub async fn run_single(&self, url: &Url) -> anyhow::Result<usize> {
        tracing::info!(entity = self.entity, %url, "scrape: fetch index");
        let html = self
            .fetcher
            .get(url)
            .await
            .with_context(|| format!("fetch index page: {url}"))?;
        let records = extract::extract(&html, self.rules, url, self.target_year)
            .context("extract index items")?;

        self.finish(records).await
    }

    // Fails only when every period fails; partial outages degrade to fewer
    // records.
    pub async fn run_paged<B>(&self, range: &MonthRange, build_url: B) -> anyhow::Result<usize>
    where
        B: Fn(NaiveDate, NaiveDate) -> anyhow::Result<Url>,
    {
        let paginated = paginate::paginate(
            self.fetcher,
            range,
            build_url,
            self.rules,
            self.target_year,
            self.concurrency,
            self.delay,
        )
        .await?;

        if paginated.pages_ok == 0 {
            anyhow::bail!(
                "no index period could be fetched ({} attempted)",
                paginated.pages_total
            );
        }
        tracing::info!(
            entity = self.entity,
            pages_ok = paginated.pages_ok,
            pages_total = paginated.pages_total,
            "scrape: index periods done"
        );

        self.finish(paginated.records).await
    }

    async fn finish(&self, records: Vec<RawRecord>) -> anyhow::Result<usize> {
        if records.is_empty() {
            tracing::warn!(
                entity = self.entity,
                "no records extracted; check the source selectors"
            );
        }

        let records = enrich::enrich(
            self.fetcher,
            records,
            self.detail,
            self.concurrency,
            self.delay,
        )
        .await;
        let count = records.len();

        let envelope = Envelope::new(self.entity, records);
        store::write_envelope(&self.output, &envelope)?;
        tracing::info!(
            entity = self.entity,
            records = count,
            path = %self.output.display(),
            "scrape: envelope written"
        );

        Ok(count)
    }
}
