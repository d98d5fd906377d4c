use anyhow::{Context, Result};
use clap::Parser;
use people_gallery::thumbs::Magick;
use people_gallery::{env, pipeline, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "make_people_js",
    about = "Build js/people-data.js from the names spreadsheet and create missing thumbnails"
)]
struct Cli {
    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Site repository root
    #[arg(long)]
    root: Option<PathBuf>,
    /// Spreadsheet to read (relative to the root)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// JS data file to write (relative to the root)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only write the JS data file
    #[arg(long)]
    skip_thumbnails: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(root) = cli.root {
        settings.repo_root = root;
    }
    if let Some(input) = cli.input {
        settings.input_sheet = input;
    }
    if let Some(output) = cli.output {
        settings.output_js = output;
    }
    info!(settings = ?settings, "starting people-data.js build");
    env::warn_if_not_isolated(&settings.isolation_var);

    let tool = Magick::new(settings.thumb_tool.clone());
    let summary = pipeline::run_people_js(&settings, &tool, !cli.skip_thumbnails)
        .with_context(|| format!("building {}", settings.output_js_path().display()))?;

    println!("Wrote {} records to {}", summary.records, summary.output.display());
    if let Some(report) = summary.thumbnails {
        if report.tool_missing {
            println!(
                "NOTE: '{}' not found. Skipped thumbnail generation.",
                settings.thumb_tool
            );
        } else {
            println!(
                "Thumbnails: {} generated, {} already present, {} missing full image, {} failed",
                report.generated.len(),
                report.present,
                report.missing_sources.len(),
                report.failed.len()
            );
            for (file, reason) in &report.failed {
                eprintln!("ERROR: failed to thumbnail {file}: {reason}");
            }
        }
    }
    Ok(())
}
