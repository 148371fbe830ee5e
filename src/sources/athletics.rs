use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use chrono::Datelike as _;
use regex::Regex;
use url::Url;

use crate::cli::AthleticsArgs;
use crate::fetch::{HttpFetcher, HttpRenderer};
use crate::pipeline::Pipeline;
use crate::rules::{FieldRule, ItemRules, PatternOutput};

pub const DEFAULT_URL: &str = "https://denverpioneers.com/index.aspx";

pub const OUTPUT_FILE: &str = "athletic_events.json";

// The scoreboard carousel is injected client side; this marks it as loaded.
const CAROUSEL_READY: &str = ".slick-track";

const GAME_LABEL: &str = r#"[aria-label^="Game information for"]"#;

pub fn rules() -> anyhow::Result<ItemRules> {
    let game_label = Regex::new(
        "Game information for (?<duTeam>.+?) versus (?<opponent>.+?) on (?<date>.+?) at",
    )
    .context("compile game label pattern")?;

    Ok(ItemRules {
        items: ".slick-track .c-scoreboard__item".to_owned(),
        scope: None,
        fields: vec![
            FieldRule::attribute("game", GAME_LABEL, "aria-label")
                .with_pattern(game_label, PatternOutput::Groups)
                .required(),
        ],
        reference: None,
    })
}

pub async fn run(args: AthleticsArgs) -> anyhow::Result<()> {
    let url = Url::parse(&args.url).context("parse --url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {url}");
    }

    let fetcher = HttpFetcher::new()?;
    let renderer = HttpRenderer::new()?;
    let rules = rules()?;

    let pipeline = Pipeline {
        fetcher: &fetcher,
        entity: "events",
        rules: &rules,
        detail: None,
        target_year: chrono::Utc::now().year(),
        concurrency: 1,
        delay: Duration::ZERO,
        output: PathBuf::from(&args.out).join(OUTPUT_FILE),
    };
    pipeline.run_rendered(&renderer, &url, CAROUSEL_READY).await?;

    Ok(())
}
