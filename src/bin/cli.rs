//! Vocabulary Crawler CLI
//!
//! Local execution entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use vocab_crawler::{
    collector::{HttpFetcher, PageFetcher},
    error::Result,
    models::{Config, OutputFormat, SeedKey},
    pipeline,
    storage::{self, ConsoleSink},
};

const DEFAULT_CONFIG: &str = "config.toml";

/// Dictionary vocabulary crawler
#[derive(Parser, Debug)]
#[command(
    name = "vocab-crawler",
    version,
    about = "Crawls an alphabetical dictionary index for vocabulary entries"
)]
struct Cli {
    /// Path to the TOML configuration file [default: config.toml if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl word pages reachable from the selected seed keys
    Crawl {
        /// Seed key to crawl ("0-9" or a letter); repeatable
        #[arg(short, long = "seed")]
        seeds: Vec<String>,

        /// Crawl all 27 seed keys, ignoring the configured selection
        #[arg(long, conflicts_with = "seeds")]
        all: bool,

        /// Crawl seed keys concurrently
        #[arg(long)]
        concurrent_seeds: bool,

        /// Output line format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Export each entry as a spreadsheet into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Do not print result lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// Crawl a single word page
    Entry {
        /// Absolute URL of the word page
        url: String,

        /// Output line format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the seed keys in crawl order
    Seeds,

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load an explicitly named config file, or `config.toml` when it exists.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => {
            log::debug!("No {}, using defaults", DEFAULT_CONFIG);
            return Ok(Config::default());
        }
    };

    let config = Config::load(path)?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn create_fetcher(config: &Config) -> Result<Arc<dyn PageFetcher>> {
    Ok(Arc::new(HttpFetcher::new(&config.crawler)?))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            seeds,
            all,
            concurrent_seeds,
            format,
            export_dir,
            quiet,
        } => {
            if all {
                config.run.seeds.clear();
            } else if !seeds.is_empty() {
                config.run.seeds = seeds;
            }
            if concurrent_seeds {
                config.run.concurrent_seeds = true;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if export_dir.is_some() {
                config.output.export_dir = export_dir;
            }
            if quiet {
                config.output.console_enabled = false;
            }

            let fetcher = create_fetcher(&config)?;
            let mut sinks = storage::build_sinks(&config)?;
            let stats = pipeline::run_crawler(&config, fetcher, &mut sinks).await?;

            log::info!(
                "Crawl complete! {}/{} word pages parsed",
                stats.entry_count,
                stats.total()
            );
        }

        Command::Entry { url, format } => {
            config.validate()?;
            let fetcher = create_fetcher(&config)?;
            let result = pipeline::run_entry(&config, fetcher, &url).await?;
            let format = format.unwrap_or(config.output.format);
            println!("{}", ConsoleSink::render(&result, format)?);
        }

        Command::Seeds => {
            for key in SeedKey::all() {
                println!("{key}");
            }
        }

        Command::Validate => pipeline::run_validate(&config)?,
    }

    Ok(())
}
