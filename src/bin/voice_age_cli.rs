use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use voice_age_predictor::{init_logging, AppConfig, AppContext, Orchestrator, PredictionReport};

#[derive(Parser, Debug)]
#[command(
    name = "voice_age_cli",
    about = "Predict age group (and emotion for senior speakers) from a voice recording"
)]
struct Cli {
    /// Audio file to analyse (mp3, wav, flac, ogg)
    file: PathBuf,
    /// JSON configuration file (defaults to assets/predictor_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the age model path
    #[arg(long)]
    age_model: Option<PathBuf>,
    /// Override the emotion model path
    #[arg(long)]
    emotion_model: Option<PathBuf>,
    /// Print the report as JSON instead of text lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    if let Some(path) = cli.age_model {
        config.models.age_model_path = path;
    }
    if let Some(path) = cli.emotion_model {
        config.models.emotion_model_path = path;
    }

    let context = AppContext::load(config).context("building predictor")?;
    let orchestrator = Orchestrator::new(context);

    let bytes = fs::read(&cli.file).with_context(|| format!("reading {}", cli.file.display()))?;
    let filename = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let report = orchestrator
        .predict_upload(&filename, &bytes)
        .context("staging upload")?;

    emit_report(&report, cli.json)?;
    Ok(ExitCode::from(0))
}

fn emit_report(report: &PredictionReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Selected file: {}", report.file);
    println!("Age Result: {}", report.age_result);
    if let Some(emotion) = &report.emotion_result {
        println!("Emotion Result: {}", emotion);
    }
    Ok(())
}
