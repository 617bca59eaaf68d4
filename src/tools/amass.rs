// src/tools/amass.rs
use crate::error::{ErrorContext, Result};
use crate::executor::{CommandSpec, ProcessRunner};
use crate::tools::{run_command, Tool};
use crate::types::{Stage, StageStatus, ToolConfig};
use async_trait::async_trait;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Active enumeration with `amass enum`.
///
/// amass writes to a temporary file, which becomes the result file only when
/// it is non-empty.
#[derive(Debug, Clone)]
pub struct AmassTool {
    config: ToolConfig,
    domains_file: PathBuf,
    tmp_output: PathBuf,
    output: PathBuf,
}

impl AmassTool {
    pub fn new(config: ToolConfig, domains_file: PathBuf, tmp_output: PathBuf, output: PathBuf) -> Self {
        Self {
            config,
            domains_file,
            tmp_output,
            output,
        }
    }

    /// Move the temporary file into place. Returns false when there was nothing to keep.
    fn promote_results(&self) -> Result<bool> {
        let size = match fs::metadata(&self.tmp_output) {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        };

        if size > 0 {
            fs::rename(&self.tmp_output, &self.output).with_context(|| {
                format!(
                    "Failed to move {} to {}",
                    self.tmp_output.display(),
                    self.output.display()
                )
            })?;
            info!("{} results saved to: {}", self.name(), self.output.display());
            return Ok(true);
        }

        warn!("{} returned no results.", self.name());
        if self.tmp_output.exists() {
            fs::remove_file(&self.tmp_output)
                .with_context(|| format!("Failed to remove {}", self.tmp_output.display()))?;
        }
        Ok(false)
    }
}

#[async_trait]
impl Tool for AmassTool {
    fn stage(&self) -> Stage {
        Stage::Active
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.config.program)
            .arg("enum")
            .arg("-df")
            .arg(self.domains_file.display().to_string())
            .arg("-o")
            .arg(self.tmp_output.display().to_string())
            .args(self.config.extra_args.iter().cloned())
    }

    fn output_file(&self) -> &Path {
        &self.output
    }

    async fn execute(&self, runner: &dyn ProcessRunner) -> Result<StageStatus> {
        // A result file left by an earlier, interrupted run must not be merged.
        if self.output.exists() {
            fs::remove_file(&self.output)
                .with_context(|| format!("Failed to remove stale {}", self.output.display()))?;
        }

        run_command(runner, &self.command(), self.name()).await?;
        self.promote_results()?;
        Ok(StageStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::{self, FakeRunner};
    use crate::types::{FailurePolicy, SubEnumError};
    use tempfile::TempDir;

    fn tool(dir: &TempDir) -> AmassTool {
        AmassTool::new(
            ToolConfig::new("amass", FailurePolicy::Continue),
            dir.path().join("domains.txt"),
            dir.path().join("amass_results.tmp"),
            dir.path().join("amass_results.txt"),
        )
    }

    #[test]
    fn test_command_writes_to_temporary_file() {
        let tool = AmassTool::new(
            ToolConfig::new("amass", FailurePolicy::Continue),
            PathBuf::from("domains.txt"),
            PathBuf::from("output/amass_results.tmp"),
            PathBuf::from("output/amass_results.txt"),
        );
        assert_eq!(
            tool.command().to_string(),
            "amass enum -df domains.txt -o output/amass_results.tmp"
        );
    }

    #[tokio::test]
    async fn test_non_empty_results_are_promoted() {
        let dir = TempDir::new().unwrap();
        let tool = tool(&dir);
        let runner = FakeRunner::new(|cmd| fake::write_flag(cmd, "-o", "y.a.com\nz.b.com\n"));

        let status = tool.execute(&runner).await.unwrap();

        assert_eq!(status, StageStatus::Completed);
        assert!(!tool.tmp_output.exists());
        assert_eq!(fs::read_to_string(&tool.output).unwrap(), "y.a.com\nz.b.com\n");
    }

    #[tokio::test]
    async fn test_empty_results_are_discarded() {
        let dir = TempDir::new().unwrap();
        let tool = tool(&dir);
        let runner = FakeRunner::new(|cmd| fake::write_flag(cmd, "-o", ""));

        tool.execute(&runner).await.unwrap();

        assert!(!tool.tmp_output.exists());
        assert!(!tool.output.exists());
    }

    #[tokio::test]
    async fn test_missing_temporary_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let tool = tool(&dir);

        let status = tool.execute(&FakeRunner::succeeding()).await.unwrap();

        assert_eq!(status, StageStatus::Completed);
        assert!(!tool.output.exists());
    }

    #[tokio::test]
    async fn test_stale_results_are_removed() {
        let dir = TempDir::new().unwrap();
        let tool = tool(&dir);
        fs::write(&tool.output, "old.a.com\n").unwrap();

        tool.execute(&FakeRunner::succeeding()).await.unwrap();

        assert!(!tool.output.exists());
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(|_| Ok(fake::failed(1, "config error")));

        let err = tool(&dir).execute(&runner).await.unwrap_err();

        assert!(matches!(err, SubEnumError::ToolFailed { .. }));
    }
}
