use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::grading::DataSource;

/// Environment variable read for the remote API key when none is configured
pub const DEFAULT_API_KEY_ENV: &str = "GPA_BRO_API_KEY";

/// Application configuration.
///
/// Example YAML:
/// ```yaml
/// source:
///   remote:
///     url: https://example.supabase.co
///     api_key_env: GPA_BRO_API_KEY
/// country: China
/// grading_mode: Numeric grade
/// weighted: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where grading systems come from (default: built-in table)
    #[serde(default)]
    pub source: Option<SourceConfig>,

    /// Country used when --country is not given
    #[serde(default)]
    pub country: Option<String>,

    /// Grading mode used when --mode is not given
    #[serde(default)]
    pub grading_mode: Option<String>,

    /// Use weighted GPA where a single figure is printed (calc --gpa-only)
    #[serde(default)]
    pub weighted: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub url: String,

    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl Config {
    /// Resolve the configured data source. A file wins over a remote
    /// endpoint; `validate_config` rejects configs that set both.
    pub fn data_source(&self) -> DataSource {
        let Some(ref source) = self.source else {
            return DataSource::Builtin;
        };

        if let Some(ref path) = source.file {
            return DataSource::File(path.clone());
        }

        match source.remote {
            Some(ref remote) => {
                let var = remote.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
                let api_key = std::env::var(var)
                    .ok()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                DataSource::Remote {
                    url: remote.url.clone(),
                    api_key,
                }
            }
            None => DataSource::Builtin,
        }
    }
}
