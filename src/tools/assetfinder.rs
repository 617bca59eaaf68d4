// src/tools/assetfinder.rs
use crate::error::{ErrorContext, Result};
use crate::executor::{CommandSpec, ProcessRunner};
use crate::tools::Tool;
use crate::types::{Stage, StageStatus, ToolConfig};
use crate::utils;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DOMAIN_PLACEHOLDER: &str = "<domain>";

/// assetfinder, invoked once per domain with its stdout appended to one file.
#[derive(Debug, Clone)]
pub struct AssetfinderTool {
    config: ToolConfig,
    domains_file: PathBuf,
    output: PathBuf,
    show_progress: bool,
}

impl AssetfinderTool {
    pub fn new(config: ToolConfig, domains_file: PathBuf, output: PathBuf) -> Self {
        Self {
            config,
            domains_file,
            output,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn command_for(&self, domain: &str) -> CommandSpec {
        CommandSpec::new(&self.config.program)
            .arg("--subs-only")
            .args(self.config.extra_args.iter().cloned())
            .arg(domain)
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }

    async fn scrape(&self, runner: &dyn ProcessRunner, bar: &ProgressBar) -> Result<usize> {
        let lines = utils::read_lines(&self.domains_file)
            .with_context(|| format!("Failed to read {}", self.domains_file.display()))?;
        let domains: Vec<&str> = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect();

        let file = File::create(&self.output)
            .with_context(|| format!("Failed to create {}", self.output.display()))?;
        let mut writer = BufWriter::new(file);

        bar.set_length(domains.len() as u64);
        let mut failed = 0;

        for domain in domains {
            bar.set_message(domain.to_string());

            match runner.run(&self.command_for(domain)).await {
                Ok(output) if output.success() => {
                    writer
                        .write_all(&output.stdout)
                        .with_context(|| format!("Failed to write {}", self.output.display()))?;
                }
                Ok(_) => {
                    warn!("{} failed for: {}", self.name(), domain);
                    failed += 1;
                }
                Err(e) => return Err(e),
            }

            bar.inc(1);
        }

        writer
            .flush()
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        Ok(failed)
    }

    async fn execute_with(&self, runner: &dyn ProcessRunner, bar: &ProgressBar) -> Result<StageStatus> {
        info!("Running: {}", self.name());

        match self.scrape(runner, bar).await {
            Ok(failed) => {
                bar.finish_and_clear();
                if failed > 0 {
                    info!("{} finished with {} failed domains", self.name(), failed);
                }
                Ok(StageStatus::Completed)
            }
            Err(e) => {
                bar.abandon();
                error!("Error in {} stage: {}", self.name(), e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Tool for AssetfinderTool {
    fn stage(&self) -> Stage {
        Stage::Scraper
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn command(&self) -> CommandSpec {
        self.command_for(DOMAIN_PLACEHOLDER)
    }

    fn output_file(&self) -> &Path {
        &self.output
    }

    async fn execute(&self, runner: &dyn ProcessRunner) -> Result<StageStatus> {
        self.execute_with(runner, &self.progress_bar()).await
    }
}
