pub mod commands;
pub mod poll;
pub mod serve;

pub use commands::{Cli, Commands};
