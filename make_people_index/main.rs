use anyhow::{Context, Result};
use clap::Parser;
use people_gallery::{env, pipeline, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "make_people_index",
    about = "Re-derive photos-with-names/people-index.json from js/people-data.js"
)]
struct Cli {
    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Site repository root
    #[arg(long)]
    root: Option<PathBuf>,
    /// JS data file to read (relative to the root)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// JSON index to write (relative to the root)
    #[arg(short, long)]
    output: Option<PathBuf>,
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
        settings.output_js = input;
    }
    if let Some(output) = cli.output {
        settings.output_json = output;
    }
    info!(settings = ?settings, "starting people index build");
    env::warn_if_not_isolated(&settings.isolation_var);

    let input = settings.output_js_path();
    let output = settings.output_json_path();
    let written = pipeline::run_people_index(&settings)
        .with_context(|| format!("converting {}", input.display()))?;

    println!("OK: wrote {} with {} entries", output.display(), written);
    Ok(())
}
