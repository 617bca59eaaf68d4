// src/tools/mod.rs
use crate::error::Result;
use crate::executor::{CommandSpec, ProcessOutput, ProcessRunner};
use crate::output::OutputLayout;
use crate::types::{Config, Stage, StageStatus, SubEnumError, ToolConfig, ToolInfo};
use crate::utils;
use async_trait::async_trait;
use log::{error, info};
use std::path::Path;

mod amass;
mod assetfinder;
mod httpx;
mod subfinder;

pub use amass::AmassTool;
pub use assetfinder::AssetfinderTool;
pub use httpx::HttpxTool;
pub use subfinder::SubfinderTool;

/// One external program wrapped as a pipeline stage.
#[async_trait]
pub trait Tool: Send + Sync {
    fn stage(&self) -> Stage;
    fn config(&self) -> &ToolConfig;

    fn name(&self) -> &str {
        &self.config().program
    }

    /// The command line this tool runs. The scraper shows a `<domain>` placeholder.
    fn command(&self) -> CommandSpec;

    /// File holding this stage's results once it completes.
    fn output_file(&self) -> &Path;

    async fn execute(&self, runner: &dyn ProcessRunner) -> Result<StageStatus>;
}

/// Run `command` to completion, failing on a non-zero exit.
pub async fn run_command(
    runner: &dyn ProcessRunner,
    command: &CommandSpec,
    description: &str,
) -> Result<ProcessOutput> {
    info!("Running: {}", description);

    let output = match runner.run(command).await {
        Ok(output) => output,
        Err(e) => {
            error!("Failed: {}\n{}", description, e);
            return Err(e);
        }
    };

    if !output.success() {
        let err = SubEnumError::ToolFailed {
            tool: description.to_string(),
            code: output.code,
            stderr: output.stderr_text(),
        };
        error!("Failed: {}\n{}", description, err);
        return Err(err);
    }

    Ok(output)
}

pub fn create_tool(stage: Stage, config: &Config, layout: &OutputLayout) -> Box<dyn Tool> {
    let tool = config.tools.get(stage).clone();
    let domains_file = config.domains_file.clone();

    match stage {
        Stage::Passive => Box::new(SubfinderTool::new(tool, domains_file, layout.passive.clone())),
        Stage::Active => Box::new(AmassTool::new(
            tool,
            domains_file,
            layout.active_tmp.clone(),
            layout.active.clone(),
        )),
        Stage::Scraper => Box::new(
            AssetfinderTool::new(tool, domains_file, layout.scraper.clone())
                .with_progress(config.show_progress),
        ),
        Stage::Prober => Box::new(HttpxTool::new(tool, layout.combined.clone(), layout.alive.clone())),
    }
}

/// The three tools whose results are merged, in merge priority order.
pub fn discovery_tools(config: &Config, layout: &OutputLayout) -> Vec<Box<dyn Tool>> {
    [Stage::Passive, Stage::Active, Stage::Scraper]
        .into_iter()
        .map(|stage| create_tool(stage, config, layout))
        .collect()
}

pub fn describe_tools(config: &Config, layout: &OutputLayout) -> Vec<ToolInfo> {
    Stage::ALL
        .into_iter()
        .map(|stage| {
            let tool = create_tool(stage, config, layout);
            ToolInfo {
                stage,
                program: tool.name().to_string(),
                command: tool.command().to_string(),
                installed: utils::binary_on_path(tool.name()),
            }
        })
        .collect()
}
