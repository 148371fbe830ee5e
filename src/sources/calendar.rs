use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use chrono::{Datelike as _, NaiveDate, Utc};
use url::Url;

use crate::cli::CalendarArgs;
use crate::enrich::DetailRule;
use crate::fetch::HttpFetcher;
use crate::paginate::MonthRange;
use crate::pipeline::Pipeline;
use crate::rules::{FieldRule, ItemRules, ReferenceRule};

pub const DEFAULT_URL: &str = "https://www.du.edu/calendar";

pub const OUTPUT_FILE: &str = "calendar_events.json";

// Fragment the listing page uses to scroll to the filtered results.
const LISTING_ANCHOR: &str = "events-listing-date-filter-anchor";

pub fn rules() -> ItemRules {
    ItemRules {
        items: "#events-listing .events-listing__item".to_owned(),
        scope: Some("a.event-card".to_owned()),
        fields: vec![
            FieldRule::text("title", "h3").required(),
            FieldRule::text("date", "p").required().with_default_year(),
            FieldRule::sibling_scan("time", "p", "span.icon-du-clock"),
        ],
        reference: Some(ReferenceRule {
            selector: None,
            attribute: "href".to_owned(),
        }),
    }
}

pub fn detail() -> DetailRule {
    DetailRule {
        container: "div.description".to_owned(),
        field: "description".to_owned(),
    }
}

pub fn period_url(base: &Url, start: NaiveDate, end: NaiveDate) -> anyhow::Result<Url> {
    let mut url = base.clone();
    url.set_query(Some(&format!("search=&start_date={start}&end_date={end}")));
    url.set_fragment(Some(LISTING_ANCHOR));
    Ok(url)
}

pub async fn run(args: CalendarArgs) -> anyhow::Result<()> {
    let base = Url::parse(&args.url).context("parse --url")?;
    if base.scheme() != "http" && base.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {base}");
    }

    let year = args.year.unwrap_or_else(|| Utc::now().year());
    let range = MonthRange::new(year, args.start_month, args.end_month)?;

    let fetcher = HttpFetcher::new()?;
    let rules = rules();
    let detail = detail();

    let pipeline = Pipeline {
        fetcher: &fetcher,
        entity: "events",
        rules: &rules,
        detail: Some(&detail),
        target_year: year,
        concurrency: args.concurrency,
        delay: Duration::from_millis(args.delay_ms),
        output: PathBuf::from(&args.out).join(OUTPUT_FILE),
    };
    pipeline
        .run_paged(&range, |start, end| period_url(&base, start, end))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;

    #[test]
    fn period_url_sets_query_and_anchor() -> anyhow::Result<()> {
        let base = Url::parse("https://www.du.edu/calendar")?;
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).expect("build start date");
        let end = NaiveDate::from_ymd_opt(2025, 4, 1).expect("build end date");

        let url = period_url(&base, start, end)?;
        assert_eq!(
            url.as_str(),
            "https://www.du.edu/calendar?search=&start_date=2025-03-01&end_date=2025-04-01#events-listing-date-filter-anchor"
        );
        Ok(())
    }

    #[test]
    fn listing_items_become_event_records() -> anyhow::Result<()> {
        let html = r#"
            <div id="events-listing">
              <div class="events-listing__item">
                <a class="event-card" href="/events/spring-gala">
                  <p>March 8</p>
                  <h3>Spring Gala</h3>
                  <p><span class="icon-du-clock"></span> 7:00 PM</p>
                </a>
              </div>
              <div class="events-listing__item"><p>promoted banner</p></div>
              <div class="events-listing__item">
                <a class="event-card" href="/events/lecture">
                  <p>March 30, 2025</p>
                  <h3>Guest Lecture</h3>
                </a>
              </div>
            </div>
        "#;
        let page = Url::parse("https://www.du.edu/calendar?search=&start_date=2025-03-01&end_date=2025-04-01")?;

        let records = extract::extract(html, &rules(), &page, 2025)?;
        assert_eq!(records.len(), 2);

        assert_eq!(
            records[0].fields.keys().collect::<Vec<_>>(),
            ["title", "date", "time"]
        );
        assert_eq!(records[0].fields["date"], "March 8, 2025");
        assert_eq!(
            records[0].reference_url.as_ref().map(Url::as_str),
            Some("https://www.du.edu/events/spring-gala")
        );

        assert_eq!(records[1].fields["date"], "March 30, 2025");
        assert!(!records[1].fields.contains_key("time"));
        Ok(())
    }
}
