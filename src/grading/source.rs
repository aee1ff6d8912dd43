use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, info, warn};

use super::registry::GradingRegistry;
use super::types::{GradeDefinition, GradeRow, GradingTable};

const GRADING_TABLE: &str = "grading_systems";

/// Where grading definitions are loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Only the injected fallback table
    Builtin,
    /// A JSON array or YAML sequence of grade rows
    File(PathBuf),
    /// A PostgREST endpoint exposing the `grading_systems` table
    Remote { url: String, api_key: Option<String> },
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Builtin => "built-in defaults".to_string(),
            DataSource::File(path) => format!("file {}", path.display()),
            DataSource::Remote { url, .. } => format!("remote {}", url),
        }
    }
}

/// Load and normalize grading definitions from a source.
///
/// The builtin source yields no rows; the caller's fallback covers it.
pub async fn load_definitions(source: &DataSource) -> Result<Vec<GradeDefinition>> {
    let rows = match source {
        DataSource::Builtin => Vec::new(),
        DataSource::File(path) => read_rows_file(path)?,
        DataSource::Remote { url, api_key } => fetch_rows(url, api_key.as_deref()).await?,
    };
    Ok(rows.into_iter().map(GradeDefinition::from).collect())
}

/// Load the grading registry, never failing.
///
/// Unreachable sources and empty results both resolve to `fallback`, so the
/// engine always sees a populated table.
pub async fn load_registry(source: &DataSource, fallback: GradingTable) -> GradingRegistry {
    if *source == DataSource::Builtin {
        debug!("Using built-in grading systems");
        return GradingRegistry::new(fallback);
    }

    match load_definitions(source).await {
        Ok(definitions) if definitions.is_empty() => {
            info!("No grading data found in {}, using defaults", source.describe());
            GradingRegistry::new(fallback)
        }
        Ok(definitions) => {
            info!(
                "Loaded {} grade definitions from {}",
                definitions.len(),
                source.describe()
            );
            GradingRegistry::from_definitions(definitions, fallback)
        }
        Err(e) => {
            warn!("Error loading grading systems from {}: {:#}", source.describe(), e);
            warn!("Falling back to default grading systems");
            GradingRegistry::new(fallback)
        }
    }
}

/// Read grade rows from disk. `.json` files are parsed as JSON, anything
/// else as YAML.
pub fn read_rows_file(path: &Path) -> Result<Vec<GradeRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read grading data at {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse grading data: invalid JSON in {}", path.display()))
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse grading data: invalid YAML in {}", path.display()))
    }
}

fn table_url(base: &str) -> String {
    format!(
        "{}/rest/v1/{}?select=*&order=grade_points.desc",
        base.trim_end_matches('/'),
        GRADING_TABLE
    )
}

/// Fetch grade rows from a PostgREST endpoint
async fn fetch_rows(base_url: &str, api_key: Option<&str>) -> Result<Vec<GradeRow>> {
    let client = reqwest::Client::new();
    let url = table_url(base_url);

    // Retry strategy: exponential backoff with 3 attempts
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(3);

    debug!("Fetching grading systems from {}", url);

    let rows = Retry::start(retry_strategy, || async {
        let mut request = client.get(&url);
        if let Some(key) = api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Grading data request failed: {}", e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(anyhow!("Grading data access denied ({}). Check the API key.", status));
        }
        if !status.is_success() {
            return Err(anyhow!("Grading data request returned {}", status));
        }

        response
            .json::<Vec<GradeRow>>()
            .await
            .map_err(|e| anyhow!("Invalid grading data response: {}", e))
    })
    .await?;

    Ok(rows)
}
