//! dockhand - container lifecycle and config file sync service

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use dockhand_config::GlobalConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(author, version, about = "Container lifecycle and config file sync service", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "DOCKHAND_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP and WebSocket service
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(long)]
        listen: Option<String>,
    },

    /// Pull the workload image, then create and start a container
    Start {
        /// Container name
        name: String,
    },

    /// Stop a container and remove it with its volumes
    Stop {
        /// Container name or ID
        name: String,
    },

    /// Show the ID and state of a container
    Status {
        /// Container name or ID
        name: String,
    },

    /// List running container IDs
    Ps,

    /// Replace a file when its content differs from a local source file
    Send {
        /// Target path to update
        path: String,
        /// Local file providing the content
        #[arg(long, short)]
        source: PathBuf,
    },

    /// Check whether a file matches a local source file
    Compare {
        /// Target path to check
        path: String,
        /// Local file providing the content
        #[arg(long, short)]
        source: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format);

    let config_path = match cli.config {
        Some(path) => path,
        None => GlobalConfig::effective_path()?,
    };

    // Config command only needs the file
    if let Commands::Config { path } = cli.command {
        return commands::config(&config_path, path);
    }

    let config = commands::load_config(&config_path)?;

    match cli.command {
        Commands::Serve { listen } => commands::serve(&config, listen).await?,
        Commands::Start { name } => commands::start(&config, &name).await?,
        Commands::Stop { name } => commands::stop(&config, &name).await?,
        Commands::Status { name } => commands::status(&config, &name).await?,
        Commands::Ps => commands::ps(&config).await?,
        Commands::Send { path, source } => commands::send(&config, &path, &source).await?,
        Commands::Compare { path, source } => commands::compare(&config, &path, &source).await?,
        Commands::Config { .. } => unreachable!(), // Handled above
    }

    Ok(())
}

/// Install the tracing subscriber; logs go to stderr so command output stays clean
fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
