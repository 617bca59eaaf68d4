// src/utils.rs
use crate::error::Result;
use crate::types::SubEnumError;
use log::{info, warn};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads lines from a file into a vector of strings.
///
/// Invalid UTF-8 is replaced rather than rejected; tool output is taken as-is.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    while reader.read_until(b'\n', &mut buf)? > 0 {
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
        buf.clear();
    }

    Ok(lines)
}

/// Load the domain list, refusing a missing or blank file.
pub fn ensure_domains_file(path: &Path) -> Result<Vec<String>> {
    let missing = || SubEnumError::MissingInput(format!("{} not found or is empty.", path.display()));

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return Err(missing()),
    };

    let domains: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if domains.is_empty() {
        return Err(missing());
    }

    info!("{} loaded ({} domains).", path.display(), domains.len());
    Ok(domains)
}

/// True when the file exists and holds anything besides whitespace.
pub fn has_content(path: &Path) -> bool {
    fs::read(path)
        .map(|contents| !String::from_utf8_lossy(&contents).trim().is_empty())
        .unwrap_or(false)
}

/// Number of non-blank lines, zero if the file is absent or unreadable.
pub fn count_lines(path: &Path) -> usize {
    if !path.exists() {
        return 0;
    }
    match read_lines(path) {
        Ok(lines) => lines.iter().filter(|line| !line.trim().is_empty()).count(),
        Err(e) => {
            warn!("Could not count results in {}: {}", path.display(), e);
            0
        }
    }
}

/// Look for an executable called `program` on `PATH`.
pub fn binary_on_path(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }

    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
