// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Timelike, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use crate::app_config::Config;
use crate::app_controller::{Controller, RunOptions};

mod app_config;
mod app_controller;
mod errors;
mod providers;
mod store;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate prediction-market titles (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for polyko
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Number of batches translated concurrently (recommended: 3-5)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Translate events ending within the next N months
    #[arg(short, long, default_value_t = 2)]
    months: i64,

    /// Start date (YYYY-MM-DD), overrides --months together with --to
    #[arg(long = "from", value_name = "DATE")]
    from_date: Option<String>,

    /// End date (YYYY-MM-DD), overrides --months together with --from
    #[arg(long = "to", value_name = "DATE")]
    to_date: Option<String>,

    /// Re-translate rows that already have a stored translation
    #[arg(long)]
    overwrite: bool,

    /// Skip rows in this category (e.g. Sports)
    #[arg(long, value_name = "CATEGORY")]
    exclude_category: Option<String>,

    /// Maximum number of batches to dispatch (dry runs)
    #[arg(long)]
    max_batches: Option<usize>,

    /// Test mode: force a single batch
    #[arg(long)]
    test: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// polyko - prediction-market title translation
///
/// Fetches untranslated event titles from the remote table, translates
/// them in concurrent batches through an LLM API, applies deterministic
/// post-processing corrections, and writes the results back.
#[derive(Parser, Debug)]
#[command(name = "polyko")]
#[command(version = "1.0.0")]
#[command(about = "Korean translation pipeline for prediction-market titles")]
#[command(long_about = "polyko fetches untranslated prediction-market event titles from the
remote table, translates them in concurrent batches through an LLM API,
applies deterministic post-processing corrections, and writes the
results back.

EXAMPLES:
    polyko                                   # next 2 months, untranslated only
    polyko -w 5 -m 6 --exclude-category Sports
    polyko --overwrite -m 2                  # re-translate everything in range
    polyko --from 2026-02-11 --to 2026-04-11
    polyko --test                            # single batch, for smoke testing
    polyko completions bash > polyko.bash    # generate bash completions

CREDENTIALS:
    OPENAI_API_KEY, SUPABASE_URL and SUPABASE_KEY must be set in the
    environment (or in the config file). The run aborts before any work
    if one is missing.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");

            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Compute the target `end_date` range.
///
/// Explicit from/to dates pass through untouched. Relative ranges start
/// at the KST day boundary (15:00 UTC of the current or previous day)
/// and span `months` x 30 days.
fn calculate_date_range(months: i64, from_date: Option<&str>, to_date: Option<&str>) -> (String, String) {
    if let (Some(from), Some(to)) = (from_date, to_date) {
        return (from.to_string(), to.to_string());
    }

    let now = Utc::now();
    let mut today_start = now
        .date_naive()
        .and_hms_opt(15, 0, 0)
        .expect("15:00:00 is a valid time")
        .and_utc();
    if now.hour() < 15 {
        today_start -= ChronoDuration::days(1);
    }

    let end = today_start + ChronoDuration::days(months * 30);

    (
        today_start.format("%Y-%m-%d %H:%M:%S+00").to_string(),
        end.format("%Y-%m-%d %H:%M:%S+00").to_string(),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "polyko", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.args).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(workers) = options.workers {
        config.translation.workers = workers;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    if config.translation.workers > 10 {
        warn!(
            "{} workers may hit the API rate limit (recommended: 3-5)",
            config.translation.workers
        );
    }

    let (start_date, end_date) = calculate_date_range(
        options.months,
        options.from_date.as_deref(),
        options.to_date.as_deref(),
    );

    // Test mode forces a single batch
    let max_batches = if options.test { Some(1) } else { options.max_batches };

    let controller = Controller::with_config(config)?;
    controller
        .run(RunOptions {
            start_date,
            end_date,
            overwrite: options.overwrite,
            exclude_category: options.exclude_category,
            max_batches,
        })
        .await
}
