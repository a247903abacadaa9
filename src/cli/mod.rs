pub mod analyze;
pub mod commands;
pub mod context;
pub mod health;
pub mod progress;
pub mod queue;
pub mod replay;
pub mod run;
pub mod stream;

pub use commands::{Cli, Commands};
pub use context::Context;
