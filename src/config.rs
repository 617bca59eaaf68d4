use crate::cli::Args;
use crate::types::{Config, Stage, SubEnumError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults, then the TOML file, then the environment, then command line flags.
pub fn build_config(args: &Args) -> Result<Config, SubEnumError> {
    let mut config = match args.config_path.as_deref() {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config);
    apply_args(&mut config, args);
    validate_config(&config)?;

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config, SubEnumError> {
    if !path.exists() {
        return Err(SubEnumError::ConfigError(format!(
            "Configuration file {} does not exist",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| SubEnumError::ConfigError(format!("Failed to read {}: {}", path.display(), e)))?;

    toml::from_str(&contents)
        .map_err(|e| SubEnumError::ConfigError(format!("Failed to parse {}: {}", path.display(), e)))
}

fn apply_env_overrides(config: &mut Config) {
    if let Some(path) = env_path("SUBENUM_DOMAINS_FILE") {
        config.domains_file = path;
    }
    if let Some(path) = env_path("SUBENUM_OUTPUT_DIR") {
        config.output_dir = path;
    }
    if let Some(path) = env_path("SUBENUM_LOG_FILE") {
        config.log_file = path;
    }

    for stage in Stage::ALL {
        if let Ok(program) = env::var(stage.env_key()) {
            if !program.trim().is_empty() {
                config.tools.get_mut(stage).program = program.trim().to_string();
            }
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(path) = &args.domains_file {
        config.domains_file = path.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(path) = &args.log_file {
        config.log_file = path.clone();
    }
    if args.keep_combined {
        config.keep_combined = true;
    }
    if args.concurrent {
        config.concurrent = true;
    }
    if args.no_progress || args.silent {
        config.show_progress = false;
    }
}

fn validate_config(config: &Config) -> Result<(), SubEnumError> {
    for (name, path) in [
        ("domains_file", &config.domains_file),
        ("output_dir", &config.output_dir),
        ("log_file", &config.log_file),
    ] {
        if path.as_os_str().is_empty() {
            return Err(SubEnumError::ConfigError(format!("{} must not be empty", name)));
        }
    }

    for stage in Stage::ALL {
        if config.tools.get(stage).program.trim().is_empty() {
            return Err(SubEnumError::ConfigError(format!(
                "No program configured for the {} stage",
                stage
            )));
        }
    }

    Ok(())
}
