use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use chrono::Datelike as _;
use regex::Regex;
use url::Url;

use crate::cli::BulletinArgs;
use crate::fetch::HttpFetcher;
use crate::pipeline::Pipeline;
use crate::rules::{FieldRule, ItemRules, PatternOutput};

pub const DEFAULT_URL: &str = "https://bulletin.du.edu/undergraduate/majorsminorscoursedescriptions/traditionalbachelorsprogrammajorandminors/computerscience/#coursedescriptionstext";

pub const OUTPUT_FILE: &str = "bulletin.json";

pub fn rules(min_course: u32) -> anyhow::Result<ItemRules> {
    let course_code =
        Regex::new(r"COMP\s+(?<code>\d{4})").context("compile course code pattern")?;

    Ok(ItemRules {
        items: ".courseblock".to_owned(),
        scope: None,
        fields: vec![
            FieldRule::text("course", ".courseblocktitle")
                .with_pattern(course_code, PatternOutput::Template("COMP-${code}".to_owned()))
                .required()
                .with_min_value("code", min_course),
            FieldRule::text("title", ".courseblocktitle").required(),
        ],
        reference: None,
    })
}

pub async fn run(args: BulletinArgs) -> anyhow::Result<()> {
    let url = Url::parse(&args.url).context("parse --url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {url}");
    }

    let fetcher = HttpFetcher::new()?;
    let rules = rules(args.min_course)?;

    let pipeline = Pipeline {
        fetcher: &fetcher,
        entity: "courses",
        rules: &rules,
        detail: None,
        target_year: chrono::Utc::now().year(),
        concurrency: 1,
        delay: Duration::ZERO,
        output: PathBuf::from(&args.out).join(OUTPUT_FILE),
    };
    pipeline.run_single(&url).await?;

    Ok(())
}
