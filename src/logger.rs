use anyhow::{Context, Result};
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Copies every write to two sinks.
pub struct TeeWriter<A, B> {
    primary: A,
    secondary: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.secondary.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

/// Terminal stream that log lines are mirrored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stdout,
    Stderr,
}

impl Console {
    /// stdout is reserved for the JSON summary when one is requested.
    pub fn for_output(json: bool) -> Self {
        if json {
            Console::Stderr
        } else {
            Console::Stdout
        }
    }

    fn writer(self) -> Box<dyn Write + Send> {
        match self {
            Console::Stdout => Box::new(io::stdout()),
            Console::Stderr => Box::new(io::stderr()),
        }
    }
}

/// Log to the console and append to `log_file`, `[timestamp] LEVEL: message`.
///
/// `RUST_LOG` still takes precedence over the level chosen here.
pub fn init(log_file: &Path, verbose: bool, console: Console) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter::new(console.writer(), file))))
        .try_init()
        .context("Logger already initialized")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writes_both_sinks() {
        let mut tee = TeeWriter::new(Vec::new(), Vec::new());
        writeln!(tee, "[2024-01-01 00:00:00] INFO: done").unwrap();
        tee.flush().unwrap();

        assert_eq!(tee.primary, b"[2024-01-01 00:00:00] INFO: done\n");
        assert_eq!(tee.primary, tee.secondary);
    }

    #[test]
    fn test_json_output_moves_logs_to_stderr() {
        assert_eq!(Console::for_output(true), Console::Stderr);
        assert_eq!(Console::for_output(false), Console::Stdout);
    }
}
