use crate::executor::{ProcessRunner, SystemRunner};
use crate::output::{cleanup_files, merge_results, OutputLayout};
use crate::tools::{create_tool, discovery_tools, Tool};
use crate::types::{
    Config, FailurePolicy, RunSummary, Stage, StageReport, StageStatus, SubEnumError,
};
use crate::utils;
use futures::future::join_all;
use log::{info, warn};
use std::fs;
use std::sync::Arc;
use std::time::Instant;

pub struct SubEnumEngine {
    config: Config,
    layout: OutputLayout,
    runner: Arc<dyn ProcessRunner>,
}

impl SubEnumEngine {
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    pub fn with_runner(config: Config, runner: Arc<dyn ProcessRunner>) -> Self {
        let layout = OutputLayout::new(&config.output_dir);
        Self {
            config,
            layout,
            runner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Validate input, run the discovery tools, merge, probe, clean up.
    ///
    /// Nothing is created in the output directory unless the domain list
    /// passes validation.
    pub async fn run(&self) -> Result<RunSummary, SubEnumError> {
        let start_time = Instant::now();

        let domains = utils::ensure_domains_file(&self.config.domains_file)?;
        self.layout.create()?;
        self.remove_stale_alive()?;

        let mut stages = Vec::with_capacity(Stage::ALL.len());
        let tools = discovery_tools(&self.config, &self.layout);

        if self.config.concurrent {
            info!("Running {} discovery tools concurrently", tools.len());
            let reports = join_all(tools.iter().map(|tool| self.run_stage(tool.as_ref()))).await;
            for report in reports {
                stages.push(report?);
            }
        } else {
            for tool in &tools {
                stages.push(self.run_stage(tool.as_ref()).await?);
            }
        }

        let combined = merge_results(&self.layout.merge_inputs(), &self.layout.combined)?;

        let prober = create_tool(Stage::Prober, &self.config, &self.layout);
        let probe_report = self.run_stage(prober.as_ref()).await?;
        let alive = probe_report.results;
        stages.push(probe_report);

        cleanup_files(&self.layout.intermediates(self.config.keep_combined));
        info!("All done. Final results in: {}", self.layout.alive.display());

        Ok(RunSummary {
            domains: domains.len(),
            stages,
            combined,
            alive,
            alive_file: self.layout.alive.clone(),
            duration: start_time.elapsed(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// The alive file of an earlier run must not survive a run whose prober is skipped.
    fn remove_stale_alive(&self) -> Result<(), SubEnumError> {
        if self.layout.alive.exists() {
            fs::remove_file(&self.layout.alive).map_err(|e| {
                SubEnumError::io(format!("Failed to remove stale {}", self.layout.alive.display()), e)
            })?;
        }
        Ok(())
    }

    /// Execute one tool and apply its failure policy.
    async fn run_stage(&self, tool: &dyn Tool) -> Result<StageReport, SubEnumError> {
        let start = Instant::now();
        let result = tool.execute(self.runner.as_ref()).await;

        let (status, results, message) = match result {
            Ok(StageStatus::Completed) => (StageStatus::Completed, utils::count_lines(tool.output_file()), None),
            Ok(status) => (status, 0, None),
            Err(e) => match tool.config().on_failure {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Continue => {
                    warn!("{} stage failed, continuing: {}", tool.stage(), e);
                    (StageStatus::Failed, 0, Some(e.to_string()))
                }
            },
        };

        Ok(StageReport {
            stage: tool.stage(),
            tool: tool.name().to_string(),
            status,
            results,
            message,
            duration: start.elapsed(),
        })
    }
}
