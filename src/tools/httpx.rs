// src/tools/httpx.rs
use crate::error::Result;
use crate::executor::{CommandSpec, ProcessRunner};
use crate::tools::{run_command, Tool};
use crate::types::{Stage, StageStatus, ToolConfig};
use crate::utils;
use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Liveness probing of the combined list with httpx.
#[derive(Debug, Clone)]
pub struct HttpxTool {
    config: ToolConfig,
    input: PathBuf,
    output: PathBuf,
}

impl HttpxTool {
    pub fn new(config: ToolConfig, input: PathBuf, output: PathBuf) -> Self {
        Self { config, input, output }
    }
}

#[async_trait]
impl Tool for HttpxTool {
    fn stage(&self) -> Stage {
        Stage::Prober
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.config.program)
            .arg("-l")
            .arg(self.input.display().to_string())
            .arg("-silent")
            .arg("-o")
            .arg(self.output.display().to_string())
            .args(self.config.extra_args.iter().cloned())
    }

    fn output_file(&self) -> &Path {
        &self.output
    }

    async fn execute(&self, runner: &dyn ProcessRunner) -> Result<StageStatus> {
        if !utils::has_content(&self.input) {
            warn!("No subdomains to probe with {}.", self.name());
            return Ok(StageStatus::Skipped);
        }

        run_command(runner, &self.command(), self.name()).await?;
        info!("Alive subdomains saved to: {}", self.output.display());
        Ok(StageStatus::Completed)
    }
}
