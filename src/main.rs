//! mat2-menu - Clean Metadata from the file manager
//!
//! Invoked by the file manager shim with the selected file URIs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mat2_menu::config::{config_path, Config};
use mat2_menu::formats::FormatFilter;
use mat2_menu::menu::{CleanMetadataAction, MenuProvider, SelectionActivation};
use mat2_menu::notify::{DesktopNotifier, Notifier};
use mat2_menu::paths::{selection_from_args, PathValidator};
use mat2_menu::processor::SelectionProcessor;
use mat2_menu::summary::summarize;
use mat2_menu::tool::{session_marker_path, CleanerTool, Mat2Tool, ToolProbe};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start cleaning right away instead of waiting for the menu to close
    #[arg(long, global = true)]
    no_delay: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the menu entries for a selection as JSON
    Items {
        /// Selected file URIs or absolute paths
        uris: Vec<String>,
    },

    /// Clean metadata from the selected files
    Clean {
        /// Selected file URIs or absolute paths
        #[arg(required = true)]
        uris: Vec<String>,
    },

    /// Check whether the cleaner is installed
    Check,

    /// Print the effective configuration as JSON
    Config {
        /// Also write it back to the configuration file
        #[arg(long)]
        write: bool,
    },
}

fn session_probe(tool: Arc<dyn CleanerTool>) -> ToolProbe {
    match session_marker_path() {
        Some(marker) => ToolProbe::with_marker(tool, marker),
        None => ToolProbe::new(tool),
    }
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_logging(&config, args.verbose)?;

    info!("mat2-menu v{} starting", env!("CARGO_PKG_VERSION"));

    let tool: Arc<dyn CleanerTool> = Arc::new(Mat2Tool::new(&config));
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new(&config));
    let validator = PathValidator::from_config(&config);

    match args.command {
        Command::Items { uris } => {
            let provider = MenuProvider::new(
                Arc::new(session_probe(tool)),
                FormatFilter::from_config(&config),
                validator,
                notifier,
            );
            let items = provider.menu_items(&uris).await;

            // The host is waiting on the items; hand them over before any dialog
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", serde_json::to_string_pretty(&items)?)?;
            stdout.flush()?;
            drop(stdout);

            provider.report_missing_tool().await;
        }
        Command::Clean { uris } => {
            let paths = selection_from_args(&uris);

            let delay = if args.no_delay {
                Duration::ZERO
            } else {
                config.activation_delay()
            };
            let action = CleanMetadataAction::new(
                SelectionProcessor::new(tool, validator),
                notifier,
                delay,
            );
            let result = action.on_selection_activated(paths).await;
            let summary = summarize(&result);
            println!("{}: {}", summary.title, summary.message);
        }
        Command::Check => {
            let probe = session_probe(tool);
            // an explicit check always asks the tool again
            probe.clear_marker();
            if probe.is_available().await {
                println!("{} is available", config.tool_command);
            } else {
                println!(
                    "{} not found. Install mat2 to use this extension: sudo apt install mat2",
                    config.tool_command
                );
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Config { write } => {
            let source = args.config.clone().unwrap_or_else(config_path);
            info!("Configuration source: {}", source.display());
            if write {
                config.save_to(&source)?;
                info!("Configuration written to {}", source.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
