use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shiptrack::{inspect, output, server};
use shiptrack_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ship-track dashboard and CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the auto-refreshing dashboard server
    Serve(ServeArgs),
    /// Render the current snapshot to a file once
    Render(RenderArgs),
    /// Print source reports, vessel summaries and recent records
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: String,
    /// Config file path (falls back to SHIPTRACK_CONFIG, then defaults)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output file path
    #[arg(long, default_value = "tracks.html")]
    out: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    format: output::RenderFormat,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Number of recent records to show
    #[arg(long, default_value_t = 20)]
    limit: usize,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = load_config(args.config.as_deref())?;
            server::serve(&args.addr, config).await
        }
        Command::Render(args) => {
            let config = load_config(args.config.as_deref())?;
            output::render_to_file(&config, &args.out, args.format)
        }
        Command::Inspect(args) => {
            let config = load_config(args.config.as_deref())?;
            inspect::run(&config, args.limit)
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    AppConfig::load_from(path).context("failed to load configuration")
}
