//! Finger counter: entry point.
//!
//! Reads hand-landmark frames produced by an external detector, counts the
//! extended fingers on each hand, and prints the per-hand counts.
//!
//! # Usage
//!
//! ```text
//! finger-counter [OPTIONS]
//!
//! Options:
//!   --config    <PATH>          Config file [default: platform config dir]
//!   --input     <PATH>          Detector frames (JSON lines) [default: stdin]
//!   --format    <text|json>     Output format [default: from config, text]
//!   --on-error  <skip|abort>    Unclassifiable frames [default: from config, skip]
//!   --log-level <FILTER>        tracing filter [default: from config, info]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                   | Flag          |
//! |----------------------------|---------------|
//! | `FINGER_COUNTER_CONFIG`    | `--config`    |
//! | `FINGER_COUNTER_INPUT`     | `--input`     |
//! | `FINGER_COUNTER_FORMAT`    | `--format`    |
//! | `FINGER_COUNTER_ON_ERROR`  | `--on-error`  |
//! | `FINGER_COUNTER_LOG_LEVEL` | `--log-level` |
//!
//! `RUST_LOG`, when set, takes precedence over every other log level source.
//! Logs go to stderr so stdout carries only rendered frames.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use finger_counter::application::{ErrorPolicy, OutputFormat};
use finger_counter::infrastructure::config::{
    config_file_path, load_config_from, AppConfig, ConfigError,
};
use finger_counter::infrastructure::run_pipeline;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Counts extended fingers per hand from hand-landmark detector frames.
#[derive(Debug, Parser)]
#[command(
    name = "finger-counter",
    about = "Counts extended fingers per hand from hand-landmark detector frames",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// When omitted, `config.toml` in the platform config directory is used
    /// if it exists.
    #[arg(long, env = "FINGER_COUNTER_CONFIG")]
    config: Option<PathBuf>,

    /// File of detector frames, one JSON object per line.  Reads stdin when
    /// omitted.
    #[arg(long, env = "FINGER_COUNTER_INPUT")]
    input: Option<PathBuf>,

    /// Output format: `text` or `json`.
    #[arg(long, env = "FINGER_COUNTER_FORMAT")]
    format: Option<OutputFormat>,

    /// What to do with a frame that cannot be classified: `skip` or `abort`.
    #[arg(long, env = "FINGER_COUNTER_ON_ERROR")]
    on_error: Option<ErrorPolicy>,

    /// Log filter, e.g. `debug` or `finger_core=trace,info`.
    #[arg(long, env = "FINGER_COUNTER_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file and applies CLI overrides on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed,
    /// or validated.
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let base = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => match config_file_path() {
                Ok(path) => load_config_from(&path)
                    .with_context(|| format!("failed to load config from {}", path.display()))?,
                Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
                Err(e) => return Err(e.into()),
            },
        };
        Ok(self.apply_overrides(base))
    }

    /// CLI values win over the file.
    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(policy) = self.on_error {
            config.output.on_error = policy;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. CLI arguments are parsed and merged over the config file.
/// 2. `tracing_subscriber` is initialised on stderr.  `RUST_LOG` wins over
///    the configured level.
/// 3. A Ctrl+C handler clears a shared `AtomicBool`.
/// 4. [`run_pipeline`] streams frames from the input to stdout until end of
///    input or shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "finger counter starting: format={}, on_error={}, thumb<{}°, finger<{}°",
        config.output.format,
        config.output.on_error,
        config.classifier.thumb_threshold_degrees,
        config.classifier.finger_threshold_degrees
    );

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, stopping");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Input and output ──────────────────────────────────────────────────────
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut stdout = tokio::io::stdout();

    let processor = config.processor();
    let renderer = config.output.format.renderer();

    let summary = run_pipeline(reader, &mut stdout, &processor, renderer.as_ref(), running)
        .await
        .context("frame pipeline failed")?;

    info!(
        "finger counter stopped: {} frames read, {} rendered, {} skipped",
        summary.frames_read, summary.frames_rendered, summary.frames_skipped
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
