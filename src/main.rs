//! Page Analyzer main entry point
//!
//! This is the command-line interface for the Page Analyzer service.

use clap::{Parser, Subcommand};
use page_analyzer::config::{load_config_or_default, Config};
use page_analyzer::server::{run_server, AppState};
use page_analyzer::{validate_url, Analyzer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page Analyzer: reports the structure of a single web page
///
/// Fetches a page and reports its HTML version, title, heading counts,
/// internal and external links, unreachable external links, and whether
/// it contains a login form.
#[derive(Parser, Debug)]
#[command(name = "page-analyzer")]
#[command(version = "1.0.0")]
#[command(about = "Analyzes the structure of a web page", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP analysis service
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze one URL and print the report as JSON
    Analyze {
        /// URL to analyze; `https://` is assumed when no scheme is given
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_json);

    let mut config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => {
            if let Some(path) = &cli.config {
                tracing::info!("Configuration loaded from: {}", path.display());
            }
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            handle_serve(config).await
        }
        Command::Analyze { url } => handle_analyze(&config, &url).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, json: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_analyzer=info,warn"),
            1 => EnvFilter::new("page_analyzer=debug,info"),
            2 => EnvFilter::new("page_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Runs the HTTP service
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(&config)?;
    tracing::info!(
        "Page timeout: {}s, probe timeout: {}s, max concurrent probes: {}",
        config.analyzer.page_timeout_secs,
        config.analyzer.probe_timeout_secs,
        config.analyzer.max_concurrent_probes
    );

    run_server(&config.server, AppState::new(analyzer)).await
}

/// Runs one analysis and prints the result
async fn handle_analyze(config: &Config, raw_url: &str) -> anyhow::Result<()> {
    let url = validate_url(raw_url)
        .map_err(|e| anyhow::anyhow!("Invalid URL format: {}", e))?;

    let analyzer = Analyzer::new(config)?;
    match analyzer.analyze(&url).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(code = e.code(), "Analysis failed: {}", e);
            Err(e.into())
        }
    }
}
