use super::common::{OnError, ProviderArgs};
use diastole_core::config::{DEFAULT_SEED, DEFAULT_SLEEP_SECS};
use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Seed for slot assignment and call order
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long, default_value = "prompts.json")]
    pub prompts: PathBuf,

    /// Directory holding continuous_instructions.txt and diastolic_instructions.txt
    #[arg(long, default_value = ".")]
    pub instructions_dir: PathBuf,

    /// Run directory for outputs/, outputs.jsonl, comparison.md and key.json
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Seconds to wait between calls
    #[arg(long, default_value_t = DEFAULT_SLEEP_SECS)]
    pub sleep: f64,

    #[arg(long, value_enum, default_value_t = OnError::Abort)]
    pub on_error: OnError,

    /// Suppress per-prompt progress lines
    #[arg(long)]
    pub quiet: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ConverseArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Conversation script: {"name", "turns": [{"id", "content"}]}
    #[arg(long, default_value = "conversation.json")]
    pub script: PathBuf,

    #[arg(long, default_value = ".")]
    pub instructions_dir: PathBuf,

    /// Transcript destination
    #[arg(long, default_value = "conversation_results.json")]
    pub output: PathBuf,

    /// Seconds to pause between the two modes
    #[arg(long, default_value_t = 1.0)]
    pub sleep: f64,
}
