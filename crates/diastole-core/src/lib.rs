pub mod blinding;
pub mod caller;
pub mod config;
pub mod engine;
pub mod errors;
pub mod instructions;
pub mod model;
pub mod prompts;
pub mod providers;
pub mod recorder;
pub mod report;

pub use errors::{RunError, RunErrorKind};
pub use model::{Category, Mode, Prompt, Slot};
