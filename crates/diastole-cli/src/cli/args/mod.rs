use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub mod run;
pub use common::*;
pub use run::*;

#[derive(Parser)]
#[command(
    name = "diastole",
    version,
    about = "Blinded A/B comparisons of two system instructions against hosted LLM APIs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Issue every prompt under both modes and write the blinded comparison
    Run(RunArgs),
    /// Rebuild comparison.md and key.json from a recorded outputs.jsonl
    Report(ReportArgs),
    /// Check a finished run directory
    Verify(VerifyArgs),
    /// Replay a scripted multi-turn conversation under both modes
    Converse(ConverseArgs),
    /// Write starter prompts, instructions and a sample conversation
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    /// Run directory holding outputs.jsonl
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Seed used for slot assignment [default: the seed in key.json, else 12345]
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct VerifyArgs {
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Prompt file the run used; when given, logged ids must match it exactly
    #[arg(long)]
    pub prompts: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite files that already exist
    #[arg(long)]
    pub force: bool,
}
