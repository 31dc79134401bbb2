//! Complexity Engine CLI
//!
//! # Usage
//!
//! ```bash
//! # Full hybrid analysis
//! complexity-cli analyze solution.py --max-n 1000 --samples 25
//!
//! # Static heuristics only (nothing is executed)
//! complexity-cli static solution.cpp
//!
//! # Inspect the sample sizes for a request
//! complexity-cli schedule --max-n 500 --samples 30
//!
//! # Print the effective configuration
//! complexity-cli config --preset thorough
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=complexity_engine=debug` for per-run detail.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use complexity_engine::config::{AnalysisConfig, Preset, ValidatedConfig};
use complexity_engine::features::sampling::SampleScheduler;
use complexity_engine::{AnalysisPipeline, AnalysisRequest, Language, StaticAnalyzer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "complexity-cli")]
#[command(about = "Hybrid time-complexity inference for Python and C++ submissions", long_about = None)]
struct Cli {
    /// YAML config file (COMPLEXITY__* environment overrides still apply)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preset when no config file is given (fast, balanced, thorough)
    #[arg(short, long, global = true, default_value = "balanced")]
    preset: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run static analysis and profiling, then reconcile
    Analyze {
        /// Source file
        file: PathBuf,

        /// python or cpp (default: from the file extension)
        #[arg(short, long)]
        language: Option<String>,

        /// Largest input size
        #[arg(long, default_value = "1000")]
        max_n: u64,

        /// Number of sample sizes
        #[arg(long, default_value = "25")]
        samples: usize,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Static heuristics only
    Static {
        /// Source file
        file: PathBuf,

        /// python or cpp (default: from the file extension)
        #[arg(short, long)]
        language: Option<String>,

        /// Print the signal as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the sample schedule
    Schedule {
        #[arg(long, default_value = "1000")]
        max_n: u64,

        #[arg(long, default_value = "25")]
        samples: usize,
    },

    /// Print the effective configuration as YAML
    Config {
        /// Also print where each section came from
        #[arg(long)]
        provenance: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.preset)?;

    match cli.command {
        Commands::Analyze {
            file,
            language,
            max_n,
            samples,
            json,
        } => {
            let source = std::fs::read_to_string(&file)?;
            let language = resolve_language(&file, language)?;
            let pipeline = AnalysisPipeline::new(config);
            let request = AnalysisRequest::new(source, language.as_str(), max_n, samples);
            let report = pipeline.analyze(&request).await?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.summary());
            }
        }
        Commands::Static {
            file,
            language,
            json,
        } => {
            let source = std::fs::read_to_string(&file)?;
            let language = resolve_language(&file, language)?;
            let signal = StaticAnalyzer::new().analyze(&source, language)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&signal)?);
            } else {
                println!("{} ({}%)", signal.detected, signal.confidence);
                for reason in &signal.explanation {
                    println!("  - {}", reason);
                }
            }
        }
        Commands::Schedule { max_n, samples } => {
            let scheduler = SampleScheduler::new(&config.sampling());
            let schedule = scheduler.generate(max_n, samples);
            let sizes: Vec<String> = schedule.iter().map(|n| n.to_string()).collect();
            println!("{} size(s): {}", schedule.len(), sizes.join(", "));
        }
        Commands::Config { provenance } => {
            print!("{}", config.to_yaml()?);
            if provenance {
                eprintln!("{}", config.provenance_summary());
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, preset: &str) -> Result<ValidatedConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(AnalysisConfig::from_yaml(&path.to_string_lossy())?),
        None => {
            let preset = Preset::from_str(preset)?;
            Ok(AnalysisConfig::from_env(preset)?)
        }
    }
}

fn resolve_language(file: &Path, explicit: Option<String>) -> Result<Language, Box<dyn std::error::Error>> {
    if let Some(name) = explicit {
        return Ok(Language::from_str(&name)?);
    }
    let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "py" => Ok(Language::Python),
        "cpp" | "cc" | "cxx" | "c++" => Ok(Language::Cpp),
        _ => Err(format!(
            "cannot infer language from '{}'; pass --language python|cpp",
            file.display()
        )
        .into()),
    }
}
