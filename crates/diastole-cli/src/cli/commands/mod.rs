pub mod converse;
mod dispatch;
pub mod init;
pub mod report;
pub(crate) mod run;
pub(crate) mod runner_builder;
pub mod verify;

pub use dispatch::dispatch;
