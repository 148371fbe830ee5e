use anyhow::Context as _;

use crate::cli::{AllArgs, AthleticsArgs, BulletinArgs, CalendarArgs};

pub mod athletics;
pub mod bulletin;
pub mod calendar;

pub async fn run_all(args: AllArgs) -> anyhow::Result<()> {
    tracing::info!(out = %args.out, "all: athletics");
    athletics::run(AthleticsArgs {
        url: args.athletics_url.clone(),
        out: args.out.clone(),
    })
    .await
    .context("athletics")?;

    tracing::info!("all: calendar");
    calendar::run(CalendarArgs {
        url: args.calendar_url.clone(),
        out: args.out.clone(),
        year: args.year,
        start_month: args.start_month,
        end_month: args.end_month,
        concurrency: args.concurrency,
        delay_ms: args.delay_ms,
    })
    .await
    .context("calendar")?;

    tracing::info!("all: bulletin");
    bulletin::run(BulletinArgs {
        url: args.bulletin_url,
        out: args.out,
        min_course: args.min_course,
    })
    .await
    .context("bulletin")?;

    Ok(())
}
