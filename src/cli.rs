use clap::Parser;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subenum",
    version,
    long_version = LONG_VERSION,
    about = "Subdomain enumeration pipeline: subfinder, amass, assetfinder, httpx",
    long_about = "subenum runs subfinder, amass and assetfinder against a list of domains,\nmerges and deduplicates what they find, and probes the result with httpx.\nOnly the list of live subdomains is kept."
)]
pub struct Args {
    /// File containing list of domains
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub domains_file: Option<PathBuf>,

    /// Directory for intermediate and final files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Log file (also mirrored to stdout)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Keep the combined subdomain list after cleanup
    #[arg(long = "keep-combined")]
    pub keep_combined: bool,

    /// Run subfinder, amass and assetfinder at the same time
    #[arg(long = "concurrent")]
    pub concurrent: bool,

    /// Print the run summary as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Hide the per-domain progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// List configured tools and whether they are installed
    #[arg(long = "list-tools")]
    pub list_tools: bool,

    /// Silent mode (no banner, no progress bar)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_valid() {
        let args = Args::parse_from(["subenum"]);
        assert!(args.domains_file.is_none());
        assert!(args.output_dir.is_none());
        assert!(!args.concurrent);
        assert!(!args.json);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from(["subenum", "--list", "d.txt", "--json", "-v", "--list-tools"]);
        assert_eq!(args.domains_file, Some(PathBuf::from("d.txt")));
        assert!(args.json);
        assert!(args.verbose);
        assert!(args.list_tools);
    }
}
