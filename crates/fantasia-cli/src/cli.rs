use super::commands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preprocess the input sequences and generate all configuration files
    Run {
        /// Path to the run configuration YAML file.
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Generate embedding and goPredSim configuration files for prepared sequence files.
    /// At least one of --seqvec / --prott5 must be given.
    Generate(commands::generate::GenerateArgs),
}

impl Cli {
    pub fn init_logging(&self) {
        let filter = match self.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Run { config } => commands::run::execute(config),
            Commands::Generate(args) => commands::generate::execute(args),
        }
    }
}
