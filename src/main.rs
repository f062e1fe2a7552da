//! Main entry point for the nobuild CLI application.
//!
//! Downloads the repository zipball to `repo.zip`, extracts the requested
//! template into the current directory and removes the archive again.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::Path;
use std::process::ExitCode;

use nobuild::cli::USAGE;
use nobuild::{Cli, Downloader, Selector, TempArchive, extract_template, zipball_url};

/// Name of the temporary archive in the working directory
const ARCHIVE_NAME: &str = "repo.zip";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            log::debug!("{e}");
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli).await {
        Ok(()) => {
            println!("Template '{}' downloaded successfully.", cli.template());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Download, extract, and clean up.
///
/// The archive guard is created before the download starts and dropped on
/// return, so `repo.zip` is gone on every path out of this function.
async fn run(cli: &Cli) -> Result<()> {
    let url = zipball_url(&cli.api_url, cli.repo());
    let archive = TempArchive::new(ARCHIVE_NAME);

    let downloader = Downloader::new().context("Error downloading repository")?;
    let size = downloader
        .download(&url, archive.path())
        .await
        .context("Error downloading repository")?;
    log::info!("downloaded {} ({size} bytes)", cli.repo());

    let selector = Selector::parse(cli.template());
    let summary = extract_template(archive.path(), &selector, Path::new("."))
        .await
        .context("Error extracting template")?;
    log::info!(
        "extracted {} files and {} directories",
        summary.files,
        summary.directories
    );

    Ok(())
}
