// src/output.rs
use crate::error::{ErrorContext, Result};
use crate::types::{RunSummary, StageStatus, SubEnumError};
use log::{info, warn};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Every file a run reads or produces inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub dir: PathBuf,
    pub passive: PathBuf,
    pub active: PathBuf,
    pub active_tmp: PathBuf,
    pub scraper: PathBuf,
    pub combined: PathBuf,
    pub alive: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            passive: dir.join("subfinder_results.txt"),
            active: dir.join("amass_results.txt"),
            active_tmp: dir.join("amass_results.tmp"),
            scraper: dir.join("assetfinder_results.txt"),
            combined: dir.join("combined_subdomains.txt"),
            alive: dir.join("subdomains_alive.txt"),
            dir,
        }
    }

    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))
    }

    /// Tool result files in merge priority order.
    pub fn merge_inputs(&self) -> [&Path; 3] {
        [self.passive.as_path(), self.active.as_path(), self.scraper.as_path()]
    }

    /// Files removed at the end of a run. The alive file is never listed.
    pub fn intermediates(&self, keep_combined: bool) -> Vec<&Path> {
        let mut files = vec![
            self.passive.as_path(),
            self.active.as_path(),
            self.active_tmp.as_path(),
            self.scraper.as_path(),
        ];
        if !keep_combined {
            files.push(self.combined.as_path());
        }
        files
    }
}

/// Concatenate `inputs` into `output`, keeping the first occurrence of each
/// trimmed non-empty line. Missing inputs are skipped.
pub fn merge_results(inputs: &[&Path], output: &Path) -> Result<usize> {
    info!("Merging results...");

    let file = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let mut seen = HashSet::new();

    for input in inputs {
        if !input.exists() {
            continue;
        }

        let mut reader = BufReader::new(
            File::open(input).with_context(|| format!("Failed to open {}", input.display()))?,
        );
        let mut buf = Vec::new();
        while reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read {}", input.display()))?
            > 0
        {
            {
                let line = String::from_utf8_lossy(&buf);
                let subdomain = line.trim();
                if !subdomain.is_empty() && seen.insert(subdomain.to_string()) {
                    writeln!(writer, "{}", subdomain)
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                }
            }
            buf.clear();
        }
    }

    writer.flush().with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Combined {} subdomains written to: {}", seen.len(), output.display());
    Ok(seen.len())
}

/// Remove each file independently; failures are logged and skipped.
/// Returns how many files were deleted.
pub fn cleanup_files(files: &[&Path]) -> usize {
    info!("Cleaning up intermediate files...");
    let mut deleted = 0;

    for file in files {
        if !file.exists() {
            continue;
        }
        match fs::remove_file(file) {
            Ok(()) => {
                info!("Deleted: {}", file.display());
                deleted += 1;
            }
            Err(e) => warn!("Could not delete {}: {}", file.display(), e),
        }
    }

    deleted
}

pub struct OutputManager {
    json: bool,
}

impl OutputManager {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn write_summary(&self, summary: &RunSummary) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.write_output(&mut handle, summary)
    }

    fn write_output<W: Write>(&self, writer: &mut W, summary: &RunSummary) -> Result<()> {
        if self.json {
            self.write_json_output(writer, summary)
        } else {
            self.write_text_output(writer, summary)
        }
    }

    fn write_text_output<W: Write>(&self, writer: &mut W, summary: &RunSummary) -> Result<()> {
        let err = |e: std::io::Error| SubEnumError::OutputError(e.to_string());

        writeln!(writer, "\n[*] Domains: {}", summary.domains).map_err(err)?;
        for report in &summary.stages {
            let status = match report.status {
                StageStatus::Completed => "ok",
                StageStatus::Skipped => "skipped",
                StageStatus::Failed => "failed",
            };
            writeln!(
                writer,
                "[*] {:<8} {:<12} {:<8} {} results in {:.2}s",
                report.stage.as_str(),
                report.tool,
                status,
                report.results,
                report.duration.as_secs_f64()
            )
            .map_err(err)?;
        }
        writeln!(writer, "[*] Combined: {}", summary.combined).map_err(err)?;
        writeln!(writer, "[*] Alive: {} -> {}", summary.alive, summary.alive_file.display()).map_err(err)?;

        Ok(())
    }

    fn write_json_output<W: Write>(&self, writer: &mut W, summary: &RunSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)
            .map_err(|e| SubEnumError::OutputError(format!("Failed to serialize JSON: {}", e)))?;

        writeln!(writer, "{}", json).map_err(|e| SubEnumError::OutputError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Stage, StageReport};
    use std::time::Duration;
    use tempfile::TempDir;

    fn layout(dir: &TempDir) -> OutputLayout {
        OutputLayout::new(dir.path())
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        fs::write(&out.passive, "x.a.com\ny.a.com\n").unwrap();
        fs::write(&out.active, "y.a.com\nz.b.com\n").unwrap();
        fs::write(&out.scraper, "").unwrap();

        let count = merge_results(&out.merge_inputs(), &out.combined).unwrap();

        assert_eq!(count, 3);
        assert_eq!(fs::read_to_string(&out.combined).unwrap(), "x.a.com\ny.a.com\nz.b.com\n");
    }

    #[test]
    fn test_merge_trims_and_drops_blank_lines() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        fs::write(&out.passive, "  b.a.com \r\n\n\t\na.a.com\n").unwrap();
        fs::write(&out.scraper, "a.a.com\nb.a.com\nc.a.com").unwrap();

        merge_results(&out.merge_inputs(), &out.combined).unwrap();

        assert_eq!(fs::read_to_string(&out.combined).unwrap(), "b.a.com\na.a.com\nc.a.com\n");
    }

    #[test]
    fn test_merge_skips_missing_inputs() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        fs::write(&out.scraper, "only.b.com\n").unwrap();

        let count = merge_results(&out.merge_inputs(), &out.combined).unwrap();

        assert_eq!(count, 1);
        assert_eq!(fs::read_to_string(&out.combined).unwrap(), "only.b.com\n");
    }

    #[test]
    fn test_merge_tolerates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        fs::write(&out.passive, "x.a.com\n").unwrap();
        fs::write(&out.active, b"x.a.com\n\xff\xfe\nz.b.com\n").unwrap();

        let count = merge_results(&out.merge_inputs(), &out.combined).unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            fs::read_to_string(&out.combined).unwrap(),
            "x.a.com\n\u{FFFD}\u{FFFD}\nz.b.com\n"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        fs::write(&out.passive, "a.x.com\nb.x.com\n").unwrap();
        fs::write(&out.active, "b.x.com\nc.x.com\na.x.com\n").unwrap();
        fs::write(&out.scraper, "d.x.com\n").unwrap();

        merge_results(&out.merge_inputs(), &out.combined).unwrap();
        let first = fs::read(&out.combined).unwrap();
        merge_results(&out.merge_inputs(), &out.combined).unwrap();
        let second = fs::read(&out.combined).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_cleanup_removes_intermediates_and_keeps_alive() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        for path in [&out.passive, &out.active, &out.scraper, &out.combined, &out.alive] {
            fs::write(path, "x\n").unwrap();
        }

        let deleted = cleanup_files(&out.intermediates(false));

        assert_eq!(deleted, 4);
        assert!(!out.passive.exists());
        assert!(!out.active.exists());
        assert!(!out.scraper.exists());
        assert!(!out.combined.exists());
        assert_eq!(fs::read_to_string(&out.alive).unwrap(), "x\n");
    }

    #[test]
    fn test_cleanup_can_keep_combined() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        fs::write(&out.passive, "x\n").unwrap();
        fs::write(&out.combined, "x\n").unwrap();

        cleanup_files(&out.intermediates(true));

        assert!(!out.passive.exists());
        assert!(out.combined.exists());
    }

    #[test]
    fn test_cleanup_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let out = layout(&dir);
        // remove_file cannot delete a directory, whoever runs the test
        fs::create_dir(&out.passive).unwrap();
        fs::write(&out.active, "x\n").unwrap();
        fs::write(&out.scraper, "x\n").unwrap();

        let deleted = cleanup_files(&out.intermediates(false));

        assert_eq!(deleted, 2);
        assert!(out.passive.exists());
        assert!(!out.active.exists());
        assert!(!out.scraper.exists());
    }

    #[test]
    fn test_json_summary() {
        let summary = RunSummary {
            domains: 2,
            stages: vec![StageReport {
                stage: Stage::Active,
                tool: "amass".to_string(),
                status: StageStatus::Failed,
                results: 0,
                message: Some("boom".to_string()),
                duration: Duration::from_millis(5),
            }],
            combined: 3,
            alive: 1,
            alive_file: PathBuf::from("output/subdomains_alive.txt"),
            duration: Duration::from_secs(1),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        };

        let mut buf = Vec::new();
        OutputManager::new(true).write_output(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["combined"], 3);
        assert_eq!(value["stages"][0]["stage"], "active");
        assert_eq!(value["stages"][0]["status"], "failed");

        let mut text = Vec::new();
        OutputManager::new(false).write_output(&mut text, &summary).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("[*] Combined: 3"));
        assert!(text.contains("failed"));
    }
}
