// src/lib.rs
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod logger;
pub mod output;
pub mod tools;
pub mod types;
pub mod utils;

pub use cli::Args;
pub use engine::SubEnumEngine;
pub use executor::{CommandSpec, ProcessOutput, ProcessRunner, SystemRunner};
pub use types::{Config, FailurePolicy, RunSummary, Stage, SubEnumError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
