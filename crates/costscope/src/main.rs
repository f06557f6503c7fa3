use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use costscope_core::config::Config;
use costscope_core::error::EngineError;
use costscope_core::validation::{self, RawRequest};
use costscope_core::EstimationOrchestrator;

use costscope_report::{json, markdown, text};

#[derive(Parser)]
#[command(name = "costscope")]
#[command(about = "Estimate software project cost and schedule, and evaluate its financial risk")]
#[command(version)]
struct Cli {
    /// Log engine stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full estimation pipeline on a JSON request
    Estimate {
        /// Path to the request file
        request: PathBuf,
        /// Config file path (defaults to .costscope.toml in the current directory or above)
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        /// Override the Monte Carlo seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the Monte Carlo iteration count
        #[arg(long)]
        iterations: Option<u64>,
    },
    /// Check a request and exit with code 0 (valid) or 1 (invalid)
    Validate {
        /// Path to the request file
        request: PathBuf,
        /// Print violations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a single estimation model and print its result as JSON
    Model {
        /// Path to the request file
        request: PathBuf,
        /// cocomo or functionPoint
        #[arg(short, long, default_value = "cocomo")]
        model: String,
    },
    /// Create a default .costscope.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Estimate {
            request,
            config,
            format,
            compact,
            seed,
            iterations,
        } => cmd_estimate(
            &request,
            config.as_deref(),
            format,
            compact,
            seed,
            iterations,
        ),
        Commands::Validate { request, json } => cmd_validate(&request, json),
        Commands::Model { request, model } => cmd_model(&request, &model),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COSTSCOPE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "costscope=debug" } else { "costscope=warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_estimate(
    request_path: &Path,
    config_path: Option<&Path>,
    format: Format,
    compact: bool,
    seed: Option<u64>,
    iterations: Option<u64>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(seed) = seed {
        config.monte_carlo.seed = seed;
    }
    if let Some(iterations) = iterations {
        config.monte_carlo.iterations = iterations;
    }
    tracing::debug!(
        seed = config.monte_carlo.seed,
        iterations = config.monte_carlo.iterations,
        "configuration loaded"
    );
    let raw = read_request(request_path)?;

    let report = match EstimationOrchestrator::new(config).run(&raw) {
        Ok(report) => report,
        Err(EngineError::Validation(failure)) => {
            match format {
                Format::Json => {
                    let err = EngineError::Validation(failure);
                    println!("{}", json::format_error(&err, compact)?);
                }
                Format::Text | Format::Markdown => {
                    print!("{}", text::format_validation_failure(&failure));
                }
            }
            process::exit(1);
        }
        Err(e) => {
            if let Format::Json = format {
                println!("{}", json::format_error(&e, compact)?);
                process::exit(2);
            }
            return Err(e.into());
        }
    };

    match format {
        Format::Text => print!("{}", text::format_report(&report)),
        Format::Json => println!("{}", json::format_report(&report, compact)?),
        Format::Markdown => print!("{}", markdown::format_report(&report)),
    }
    Ok(())
}

fn cmd_validate(request_path: &Path, as_json: bool) -> Result<()> {
    let raw = read_request(request_path)?;
    match validation::validate(&raw) {
        Ok(spec) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&spec)?);
            } else {
                println!(
                    "Request is valid: {} LOC, {}, team of {}",
                    spec.size_loc,
                    spec.process_class,
                    spec.team_size()
                );
            }
            Ok(())
        }
        Err(failure) => {
            if as_json {
                let err = EngineError::Validation(failure);
                println!("{}", json::format_error(&err, false)?);
            } else {
                print!("{}", text::format_validation_failure(&failure));
            }
            process::exit(1);
        }
    }
}

fn cmd_model(request_path: &Path, model: &str) -> Result<()> {
    let raw = read_request(request_path)?;
    let orchestrator = EstimationOrchestrator::new(Config::default());
    match orchestrator.estimate_with(&raw, model) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(EngineError::Validation(failure)) => {
            print!("{}", text::format_validation_failure(&failure));
            process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".costscope.toml");
    if target.exists() && !force {
        anyhow::bail!(".costscope.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created .costscope.toml with default configuration.");
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(Path::new("."))),
    }
}

fn read_request(path: &Path) -> Result<RawRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file '{}'", path.display()))?;
    RawRequest::from_json_str(&content)
        .with_context(|| format!("'{}' is not a JSON object", path.display()))
}
