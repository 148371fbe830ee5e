use std::time::Duration;

use futures::StreamExt as _;
use futures::stream;
use scraper::{Html, Selector};
use url::Url;

use crate::extract::RawRecord;
use crate::fetch::Fetcher;
use crate::records::Record;

#[derive(Debug, Clone)]
pub struct DetailRule {
    pub container: String,
    pub field: String,
}

// Output keeps the input order; a failed or empty detail page leaves the
// record without the detail field.
pub async fn enrich(
    fetcher: &dyn Fetcher,
    records: Vec<RawRecord>,
    detail: Option<&DetailRule>,
    concurrency: usize,
    delay: Duration,
) -> Vec<Record> {
    let Some(detail) = detail else {
        return records
            .into_iter()
            .map(|record| Record::from_fields(record.fields))
            .collect();
    };

    stream::iter(records)
        .map(|record| async move {
            let RawRecord {
                mut fields,
                reference_url,
            } = record;

            if let Some(url) = reference_url {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                if let Some(text) = fetch_detail(fetcher, &url, detail).await {
                    fields.insert(detail.field.clone(), text);
                }
            }

            Record::from_fields(fields)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

pub async fn fetch_detail(fetcher: &dyn Fetcher, url: &Url, detail: &DetailRule) -> Option<String> {
    let html = match fetcher.get(url).await {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(%url, "detail fetch failed: {err:#}");
            return None;
        }
    };

    let text = extract_detail_text(&html, &detail.container);
    if text.is_none() {
        tracing::debug!(%url, container = %detail.container, "detail page had no usable copy");
    }
    text
}

fn extract_detail_text(html: &str, container: &str) -> Option<String> {
    let container = Selector::parse(container).ok()?;
    let paragraph = Selector::parse("p").ok()?;

    let document = Html::parse_document(html);
    let root = document.select(&container).next()?;
    let text = root
        .select(&paragraph)
        .map(|p| p.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    (!text.is_empty()).then_some(text)
}
