//! jobdigest CLI
//!
//! Local execution entry point, intended to be invoked once per day from
//! cron or a systemd timer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jobdigest::{
    adapters,
    error::Result,
    models::{Config, RunStats},
    notify::{EmailConfig, Mailer},
    pipeline::{RunOptions, run_digest},
    store::{JsonSeenStore, SeenStore},
};

/// jobdigest - Daily DevOps job digest
#[derive(Parser, Debug)]
#[command(
    name = "jobdigest",
    version,
    about = "Aggregates new DevOps/SRE job postings into a daily email digest"
)]
struct Cli {
    /// Path to storage directory containing config and state files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full digest: collect, dedup, extract, render, deliver
    Run {
        /// Write the digest to disk instead of emailing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and email settings
    Validate,

    /// Purge seen records older than the retention window
    Purge {
        /// Override retention days from config
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show seen-store and last-run info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Whether an environment variable is set to a truthy value.
fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Load config.toml and apply environment overrides.
fn load_config(storage_dir: &std::path::Path) -> Config {
    let mut config = Config::load_or_default(storage_dir.join("config.toml"));

    if let Ok(value) = std::env::var("COMPANY_CAREER_PAGES") {
        let pages: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !pages.is_empty() {
            config.career_pages = pages;
        }
    }

    config
}

#[tokio::main]
async fn main() -> ExitCode {
    // Environment file is optional; real deployments use exported variables.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli.storage_dir);
    let store_path = cli.storage_dir.join("seen_jobs.json");

    match cli.command {
        Command::Run { dry_run } => {
            log::info!("jobdigest starting...");

            let dry_run = dry_run || env_flag("DRY_RUN");
            let mailer = if dry_run {
                None
            } else {
                Some(Mailer::new(EmailConfig::from_env()?)?)
            };

            let store = JsonSeenStore::open(&store_path).await?;
            let sources = adapters::all_sources(&config);
            let options = RunOptions {
                storage_dir: cli.storage_dir.clone(),
            };

            let report =
                run_digest(&config, &store, &sources, mailer.as_ref(), &options).await?;

            log::info!(
                "Run complete: {} fetched, {} new, {}/{} sources succeeded",
                report.stats.fetched_count,
                report.stats.new_count,
                report.stats.source_total - report.stats.source_failures.len(),
                report.stats.source_total
            );

            Ok(ExitCode::from(report.status.exit_code()))
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} roles, {} locations)",
                config.search.roles.len(),
                config.search.locations.len()
            );

            match EmailConfig::from_env() {
                Ok(email) => log::info!(
                    "✓ Email OK ({}:{} -> {})",
                    email.smtp_host,
                    email.smtp_port,
                    email.recipient
                ),
                Err(e) => {
                    log::error!("Email settings invalid: {}", e);
                    return Err(e);
                }
            }

            log::info!("All validations passed!");
            Ok(ExitCode::SUCCESS)
        }

        Command::Purge { days } => {
            let days = days.unwrap_or(config.retention.days);
            if days == 0 {
                log::warn!("Retention is disabled (days = 0); nothing to purge");
                return Ok(ExitCode::SUCCESS);
            }

            let store = JsonSeenStore::open(&store_path).await?;
            let removed = store
                .purge_older_than(chrono::Duration::days(i64::from(days)))
                .await?;
            log::info!(
                "Purged {} records older than {} days ({} remaining)",
                removed,
                days,
                store.record_count().await?
            );

            Ok(ExitCode::SUCCESS)
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            if store_path.exists() {
                let store = JsonSeenStore::open(&store_path).await?;
                log::info!("Seen store: {} records", store.record_count().await?);
            } else {
                log::info!("Seen store: not created yet");
            }

            let stats_path = cli.storage_dir.join("stats.json");
            if stats_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&stats_path) {
                    if let Ok(stats) = serde_json::from_str::<RunStats>(&content) {
                        log::info!(
                            "Last run: {} ({} new of {} fetched, {} source failures)",
                            stats.end_time.format("%Y-%m-%d %H:%M UTC"),
                            stats.new_count,
                            stats.fetched_count,
                            stats.source_failures.len()
                        );
                    }
                }
            } else {
                log::info!("No run recorded yet.");
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
