use anyhow::Result;
use clap::Parser;
use or1k_cli::commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "or1k-dis", version, about = "Inspect and exercise the OR1K decode tables")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    Cli::parse().command.run()
}
