use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use duscrape::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    duscrape::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::All(args) => {
            duscrape::sources::run_all(args).await.context("all")?;
        }
        Command::Athletics(args) => {
            duscrape::sources::athletics::run(args)
                .await
                .context("athletics")?;
        }
        Command::Bulletin(args) => {
            duscrape::sources::bulletin::run(args)
                .await
                .context("bulletin")?;
        }
        Command::Calendar(args) => {
            duscrape::sources::calendar::run(args)
                .await
                .context("calendar")?;
        }
    }

    Ok(())
}
