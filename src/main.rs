use std::{fs, path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use phish_sentry::{
    config::load_config,
    core::{engine::Engine, types::AnalysisRequest},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "phish-sentry",
    about = "Multi-factor phishing risk scoring for a hostname or collector capture"
)]
struct Cli {
    /// Hostname to analyze (lower-case, no scheme)
    target: Option<String>,
    /// Path to a page-collector capture (JSON AnalysisRequest); overrides the hostname
    #[arg(long)]
    request: Option<String>,
    /// Path to config file (TOML). Default: config/phish-sentry.toml
    #[arg(long)]
    config: Option<String>,
    /// Disable the advisory context analyzer even when an API key is set
    #[arg(long)]
    no_context: bool,
    /// Increase verbosity (info, debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Optional log file path
    #[arg(long, default_value = "data/sentry.log")]
    log_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli)?;

    let mut cfg = load_config(cli.config.as_deref())?;
    if cli.no_context {
        cfg.context_enabled = false;
    }

    let request = if let Some(path) = &cli.request {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading capture {path}"))?;
        serde_json::from_str::<AnalysisRequest>(&content)
            .with_context(|| format!("parsing capture {path}"))?
    } else if let Some(target) = &cli.target {
        AnalysisRequest {
            hostname: target.to_lowercase(),
            url: format!("https://{}/", target.to_lowercase()),
            ..Default::default()
        }
    } else {
        bail!("no target provided; pass a hostname or --request");
    };

    let engine = Engine::new(cfg)?;
    let result = engine.analyze(&request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cli.log_file);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).context("creating log directory")?;
    }
    if log_path.exists() {
        if let Ok(meta) = fs::metadata(log_path) {
            if meta.len() > 1_000_000 {
                let rotated = log_path.with_extension("log.1");
                let _ = fs::rename(log_path, rotated);
            }
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false);

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("installing tracing subscriber")
}
