// src/tools/subfinder.rs
use crate::error::Result;
use crate::executor::{CommandSpec, ProcessRunner};
use crate::tools::{run_command, Tool};
use crate::types::{Stage, StageStatus, ToolConfig};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Passive discovery with subfinder, all sources, recursive.
#[derive(Debug, Clone)]
pub struct SubfinderTool {
    config: ToolConfig,
    domains_file: PathBuf,
    output: PathBuf,
}

impl SubfinderTool {
    pub fn new(config: ToolConfig, domains_file: PathBuf, output: PathBuf) -> Self {
        Self {
            config,
            domains_file,
            output,
        }
    }
}

#[async_trait]
impl Tool for SubfinderTool {
    fn stage(&self) -> Stage {
        Stage::Passive
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.config.program)
            .arg("-dL")
            .arg(self.domains_file.display().to_string())
            .args(["--all", "--recursive"])
            .arg("-o")
            .arg(self.output.display().to_string())
            .args(self.config.extra_args.iter().cloned())
    }

    fn output_file(&self) -> &Path {
        &self.output
    }

    async fn execute(&self, runner: &dyn ProcessRunner) -> Result<StageStatus> {
        run_command(runner, &self.command(), self.name()).await?;
        Ok(StageStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::{self, FakeRunner};
    use crate::types::{FailurePolicy, SubEnumError};

    fn tool() -> SubfinderTool {
        SubfinderTool::new(
            ToolConfig::new("subfinder", FailurePolicy::Abort),
            PathBuf::from("domains.txt"),
            PathBuf::from("output/subfinder_results.txt"),
        )
    }

    #[test]
    fn test_command_arguments() {
        assert_eq!(
            tool().command().to_string(),
            "subfinder -dL domains.txt --all --recursive -o output/subfinder_results.txt"
        );
    }

    #[test]
    fn test_extra_args_are_appended() {
        let mut config = ToolConfig::new("/usr/local/bin/subfinder", FailurePolicy::Abort);
        config.extra_args = vec!["-t".to_string(), "50".to_string()];
        let tool = SubfinderTool::new(config, PathBuf::from("d.txt"), PathBuf::from("o.txt"));

        assert_eq!(
            tool.command().to_string(),
            "/usr/local/bin/subfinder -dL d.txt --all --recursive -o o.txt -t 50"
        );
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let runner = FakeRunner::new(|_| Ok(fake::failed(1, "no providers")));
        let err = tool().execute(&runner).await.unwrap_err();
        assert!(matches!(err, SubEnumError::ToolFailed { .. }));
    }
}
