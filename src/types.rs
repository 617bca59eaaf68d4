// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub domains_file: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    pub keep_combined: bool,
    pub concurrent: bool,
    pub show_progress: bool,
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains_file: PathBuf::from("domains.txt"),
            output_dir: PathBuf::from("output"),
            log_file: PathBuf::from("subdomain_enum.log"),
            keep_combined: false,
            concurrent: false,
            show_progress: atty::is(atty::Stream::Stderr),
            tools: ToolsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    pub passive: ToolConfig,
    pub active: ToolConfig,
    pub scraper: ToolConfig,
    pub prober: ToolConfig,
}

impl ToolsConfig {
    pub fn get(&self, stage: Stage) -> &ToolConfig {
        match stage {
            Stage::Passive => &self.passive,
            Stage::Active => &self.active,
            Stage::Scraper => &self.scraper,
            Stage::Prober => &self.prober,
        }
    }

    pub fn get_mut(&mut self, stage: Stage) -> &mut ToolConfig {
        match stage {
            Stage::Passive => &mut self.passive,
            Stage::Active => &mut self.active,
            Stage::Scraper => &mut self.scraper,
            Stage::Prober => &mut self.prober,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            passive: ToolConfig::new("subfinder", FailurePolicy::Abort),
            // amass failures have always been logged and ignored
            active: ToolConfig::new("amass", FailurePolicy::Continue),
            scraper: ToolConfig::new("assetfinder", FailurePolicy::Abort),
            prober: ToolConfig::new("httpx", FailurePolicy::Abort),
        }
    }
}

/// Binary and failure handling for one external tool.
///
/// `extra_args` are appended after the built-in arguments, never in place of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    pub program: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl ToolConfig {
    pub fn new(program: &str, on_failure: FailurePolicy) -> Self {
        Self {
            program: program.to_string(),
            extra_args: Vec::new(),
            on_failure,
        }
    }
}

/// What a stage does with its own failure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log and propagate, ending the run.
    #[default]
    Abort,
    /// Log and carry on with the next stage.
    Continue,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Passive,
    Active,
    Scraper,
    Prober,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Passive, Stage::Active, Stage::Scraper, Stage::Prober];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Passive => "passive",
            Stage::Active => "active",
            Stage::Scraper => "scraper",
            Stage::Prober => "prober",
        }
    }

    /// Suffix used by the `SUBENUM_<STAGE>_BIN` overrides.
    pub fn env_key(&self) -> String {
        format!("SUBENUM_{}_BIN", self.as_str().to_uppercase())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub tool: String,
    pub status: StageStatus,
    pub results: usize,
    pub message: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub domains: usize,
    pub stages: Vec<StageReport>,
    pub combined: usize,
    pub alive: usize,
    pub alive_file: PathBuf,
    pub duration: Duration,
    pub timestamp: String,
}

impl RunSummary {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }
}

pub struct ToolInfo {
    pub stage: Stage,
    pub program: String,
    pub command: String,
    pub installed: bool,
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum SubEnumError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} terminated with {}: {stderr}", describe_code(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Output error: {0}")]
    OutputError(String),
}

impl SubEnumError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        SubEnumError::Io {
            context: context.into(),
            source,
        }
    }
}
