use std::time::Duration;

use anyhow::Context as _;
use chrono::NaiveDate;
use futures::StreamExt as _;
use futures::stream;
use url::Url;

use crate::extract::{self, RawRecord};
use crate::fetch::Fetcher;
use crate::rules::ItemRules;

#[derive(Debug, Clone, Copy)]
pub struct MonthRange {
    year: i32,
    start_month: u32,
    end_month: u32,
}

impl MonthRange {
    pub fn new(year: i32, start_month: u32, end_month: u32) -> anyhow::Result<Self> {
        if !(1..=12).contains(&start_month) || !(1..=12).contains(&end_month) {
            anyhow::bail!("months must be within 1-12: {start_month}-{end_month}");
        }
        if start_month > end_month {
            anyhow::bail!("start month {start_month} is after end month {end_month}");
        }

        Ok(Self {
            year,
            start_month,
            end_month,
        })
    }

    // Half-open month periods; December ends on January 1 of the next year.
    pub fn periods(&self) -> anyhow::Result<Vec<(NaiveDate, NaiveDate)>> {
        let mut periods = Vec::new();
        for month in self.start_month..=self.end_month {
            let start = first_of_month(self.year, month)?;
            let end = if month == 12 {
                first_of_month(self.year + 1, 1)?
            } else {
                first_of_month(self.year, month + 1)?
            };
            periods.push((start, end));
        }
        Ok(periods)
    }
}

fn first_of_month(year: i32, month: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid calendar month: {year}-{month:02}"))
}

#[derive(Debug)]
pub struct Paginated {
    pub records: Vec<RawRecord>,
    pub pages_ok: usize,
    pub pages_total: usize,
}

// A failed period contributes zero records; the output keeps ascending
// period order regardless of fetch concurrency.
pub async fn paginate<B>(
    fetcher: &dyn Fetcher,
    range: &MonthRange,
    build_url: B,
    rules: &ItemRules,
    target_year: i32,
    concurrency: usize,
    delay: Duration,
) -> anyhow::Result<Paginated>
where
    B: Fn(NaiveDate, NaiveDate) -> anyhow::Result<Url>,
{
    let mut urls = Vec::new();
    for (start, end) in range.periods()? {
        let url = build_url(start, end).with_context(|| format!("build index url for {start}"))?;
        urls.push(url);
    }
    let pages_total = urls.len();

    let pages: Vec<Option<Vec<RawRecord>>> = stream::iter(urls)
        .map(|url| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tracing::info!(%url, "scrape: index period");

            let html = match fetcher.get(&url).await {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(%url, "index period fetch failed: {err:#}");
                    return None;
                }
            };
            match extract::extract(&html, rules, &url, target_year) {
                Ok(records) => Some(records),
                Err(err) => {
                    tracing::warn!(%url, "index period extraction failed: {err:#}");
                    None
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let pages_ok = pages.iter().filter(|page| page.is_some()).count();
    let records = pages.into_iter().flatten().flatten().collect();

    Ok(Paginated {
        records,
        pages_ok,
        pages_total,
    })
}
