mod schema;

pub use schema::{Config, RemoteConfig, SourceConfig, DEFAULT_API_KEY_ENV};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/gpa-bro/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("gpa-bro"))
}

/// Get the default config file path (~/.config/gpa-bro/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/gpa-bro/config.yaml), and a missing default file yields the
///   default configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => match get_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref source) = config.source {
        if source.file.is_some() && source.remote.is_some() {
            errors.push("source: set either 'file' or 'remote', not both".to_string());
        }

        if let Some(ref file) = source.file {
            if file.as_os_str().is_empty() {
                errors.push("source.file: must not be empty".to_string());
            }
        }

        if let Some(ref remote) = source.remote {
            let url = remote.url.trim();
            if url.is_empty() {
                errors.push("source.remote.url: must not be empty".to_string());
            } else if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(format!(
                    "source.remote.url: invalid '{}' - must start with http:// or https://",
                    remote.url
                ));
            }
            if let Some(ref var) = remote.api_key_env {
                if var.trim().is_empty() {
                    errors.push("source.remote.api_key_env: must not be empty".to_string());
                }
            }
        }
    }

    if let Some(ref country) = config.country {
        if country.trim().is_empty() {
            errors.push("country: must not be empty".to_string());
        }
    }

    if config.grading_mode.is_some() && config.country.is_none() {
        errors.push("grading_mode: requires 'country' to be set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
