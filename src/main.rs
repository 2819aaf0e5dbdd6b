use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use origami::pipeline::{PipelineDef, load_pipeline_file, render};
use std::fs;
use std::path::{Path, PathBuf};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(default_filter: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("origami")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("origami.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => {
            println!("{}", "No command given; try `origami --help`".yellow());
            Ok(())
        }
        Some(Commands::Validate { file }) => handle_validate_command(file),
        Some(Commands::Render { file }) => handle_render_command(file),
        Some(Commands::Fmt { file, write }) => handle_fmt_command(file, *write),
        Some(Commands::Walk {
            file,
            start,
            max_steps,
            personas,
        }) => handle_walk_command(file, start.as_deref(), *max_steps, personas, config).await,
    }
}

fn load_validated(file: &Path) -> Result<PipelineDef> {
    let def = load_pipeline_file(file).context(format!("Failed to load pipeline from {}", file.display()))?;
    def.validate()
        .context(format!("Invalid pipeline in {}", file.display()))?;
    Ok(def)
}

fn handle_validate_command(file: &Path) -> Result<()> {
    info!("Validating pipeline: {}", file.display());
    let def = load_validated(file)?;
    println!(
        "{} {} ({} nodes, {} edges, {} zones)",
        "Valid:".green(),
        def.name,
        def.nodes.len(),
        def.edges.len(),
        def.zones.len()
    );
    Ok(())
}

fn handle_render_command(file: &Path) -> Result<()> {
    info!("Rendering pipeline: {}", file.display());
    let def = load_validated(file)?;
    print!("{}", render(&def));
    Ok(())
}

fn handle_fmt_command(file: &Path, write: bool) -> Result<()> {
    info!("Formatting pipeline: {} (write: {})", file.display(), write);
    let def = load_pipeline_file(file).context(format!("Failed to load pipeline from {}", file.display()))?;
    let yaml = def.to_yaml()?;
    if write {
        fs::write(file, &yaml).context(format!("Failed to write {}", file.display()))?;
        println!("{} {}", "Formatted:".green(), file.display());
    } else {
        print!("{}", yaml);
    }
    Ok(())
}

async fn handle_walk_command(
    file: &Path,
    start: Option<&str>,
    max_steps: Option<usize>,
    personas: &[String],
    config: &Config,
) -> Result<()> {
    info!("Walking pipeline: {}", file.display());
    let def = load_validated(file)?;
    println!("{} {}", "Walking:".cyan(), def.name);

    let report = cli::dryrun::dry_run(&def, config, start, max_steps, personas).await?;

    println!("{} {} steps", "Complete:".green(), report.steps);
    for walker in report.walkers.iter().filter(|w| !w.path.is_empty()) {
        println!("  {} {}", format!("{}:", walker.persona).cyan(), walker.path.join(" -> "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging at the configured level
    setup_logging(config.log_filter()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
