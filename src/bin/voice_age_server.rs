use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use voice_age_predictor::http::{run_http_server, HttpState};
use voice_age_predictor::{init_logging, AppConfig, AppContext, Orchestrator};

#[derive(Parser, Debug)]
#[command(name = "voice_age_server", about = "HTTP upload endpoint for voice age prediction")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
    /// JSON configuration file (defaults to assets/predictor_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    let context = AppContext::load(config).context("building predictor")?;
    let state = HttpState::new(Orchestrator::new(context));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(run_http_server(state, cli.addr))
}
