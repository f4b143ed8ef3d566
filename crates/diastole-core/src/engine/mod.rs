pub mod conversation;
pub mod runner;

pub use conversation::{
    load_script, run_conversation, write_transcript, ConversationScript, ConversationTranscript,
    ConversationTurn, TurnResult,
};
pub use runner::{ExperimentRunner, RunSummary};
