use clap::{Args, Parser, Subcommand};

use crate::sources::{athletics, bulletin, calendar};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    All(AllArgs),
    Athletics(AthleticsArgs),
    Bulletin(BulletinArgs),
    Calendar(CalendarArgs),
}

#[derive(Debug, Args)]
pub struct AthleticsArgs {
    /// Scoreboard page URL (must be http/https).
    #[arg(long, default_value = athletics::DEFAULT_URL)]
    pub url: String,

    /// Output directory for result files.
    #[arg(long, default_value = "results")]
    pub out: String,
}

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Calendar base URL (must be http/https).
    #[arg(long, default_value = calendar::DEFAULT_URL)]
    pub url: String,

    /// Output directory for result files.
    #[arg(long, default_value = "results")]
    pub out: String,

    /// Year applied to listing dates that omit one (default: current year).
    #[arg(long)]
    pub year: Option<i32>,

    /// First month of the scraped window (1-12).
    #[arg(long, default_value_t = 1)]
    pub start_month: u32,

    /// Last month of the scraped window (1-12).
    #[arg(long, default_value_t = 12)]
    pub end_month: u32,

    /// Maximum concurrent HTTP requests.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Delay before each request (politeness).
    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,
}

#[derive(Debug, Args)]
pub struct BulletinArgs {
    /// Course catalog page URL (must be http/https).
    #[arg(long, default_value = bulletin::DEFAULT_URL)]
    pub url: String,

    /// Output directory for result files.
    #[arg(long, default_value = "results")]
    pub out: String,

    /// Lowest course code to keep (upper-division cutoff).
    #[arg(long, default_value_t = 3000)]
    pub min_course: u32,
}

#[derive(Debug, Args)]
pub struct AllArgs {
    /// Output directory for result files.
    #[arg(long, default_value = "results")]
    pub out: String,

    /// Scoreboard page URL (must be http/https).
    #[arg(long, default_value = athletics::DEFAULT_URL)]
    pub athletics_url: String,

    /// Calendar base URL (must be http/https).
    #[arg(long, default_value = calendar::DEFAULT_URL)]
    pub calendar_url: String,

    /// Course catalog page URL (must be http/https).
    #[arg(long, default_value = bulletin::DEFAULT_URL)]
    pub bulletin_url: String,

    /// Year applied to listing dates that omit one (default: current year).
    #[arg(long)]
    pub year: Option<i32>,

    /// First month of the scraped window (1-12).
    #[arg(long, default_value_t = 1)]
    pub start_month: u32,

    /// Last month of the scraped window (1-12).
    #[arg(long, default_value_t = 12)]
    pub end_month: u32,

    /// Maximum concurrent HTTP requests.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Delay before each request (politeness).
    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,

    /// Lowest course code to keep (upper-division cutoff).
    #[arg(long, default_value_t = 3000)]
    pub min_course: u32,
}
