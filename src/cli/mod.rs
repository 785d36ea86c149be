//! CLI module - argument parsing and interactive prompts

mod args;
mod prompts;

pub use args::{default_output_dir, Cli, Commands};
pub use prompts::*;
