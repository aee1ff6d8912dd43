use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a national grading system.
///
/// Field names on the wire follow the `grading_systems` table columns so the
/// same struct reads local files and remote rows after normalization.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GradeDefinition {
    #[serde(rename = "country_name")]
    pub country: String,

    pub grading_mode: String,

    /// Native symbol, e.g. "A*" or "90-100"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_grade: Option<String>,

    /// U.S. equivalent letter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_grade_letter: Option<String>,

    /// Inclusive lower bound of the numeric band
    #[serde(rename = "grade_range_min")]
    pub range_min: f64,

    /// Inclusive upper bound of the numeric band
    #[serde(rename = "grade_range_max")]
    pub range_max: f64,

    pub grade_points: f64,

    #[serde(
        rename = "grade_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_scale_info: Option<String>,
}

impl GradeDefinition {
    /// Whether a numeric grade falls inside this definition's band.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.range_min && value <= self.range_max
    }

    /// Range label as shown to users: "93-100", or "5" when min == max.
    pub fn range_label(&self) -> String {
        if self.range_min == self.range_max {
            format!("{}", self.range_min)
        } else {
            format!("{}-{}", self.range_min, self.range_max)
        }
    }
}

/// A grading-table row as delivered by the remote store.
///
/// Every column except the identifying ones and the points may be null.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GradeRow {
    pub country_name: String,
    pub grading_mode: String,
    #[serde(default)]
    pub local_grade: Option<String>,
    #[serde(default)]
    pub us_grade_letter: Option<String>,
    #[serde(default)]
    pub grade_range_min: Option<f64>,
    #[serde(default)]
    pub grade_range_max: Option<f64>,
    pub grade_points: f64,
    #[serde(default)]
    pub grade_description: Option<String>,
    #[serde(default)]
    pub attention: Option<String>,
    #[serde(default)]
    pub additional_scale_info: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<GradeRow> for GradeDefinition {
    fn from(row: GradeRow) -> Self {
        Self {
            country: row.country_name,
            grading_mode: row.grading_mode,
            local_grade: non_empty(row.local_grade),
            us_grade_letter: non_empty(row.us_grade_letter),
            range_min: row.grade_range_min.unwrap_or(0.0),
            range_max: row.grade_range_max.unwrap_or(0.0),
            grade_points: row.grade_points,
            description: non_empty(row.grade_description),
            attention: non_empty(row.attention),
            additional_scale_info: non_empty(row.additional_scale_info),
        }
    }
}

/// Grading definitions grouped by country name.
///
/// Definitions keep their load order within a country; that order decides
/// which band wins when ranges overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradingTable {
    systems: BTreeMap<String, Vec<GradeDefinition>>,
}

impl GradingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group definitions by their country, preserving order.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = GradeDefinition>,
    {
        let mut table = Self::new();
        for definition in definitions {
            table.push(definition);
        }
        table
    }

    pub fn push(&mut self, definition: GradeDefinition) {
        self.systems
            .entry(definition.country.clone())
            .or_default()
            .push(definition);
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.systems.values().map(Vec::len).sum()
    }

    pub fn get(&self, country: &str) -> Option<&[GradeDefinition]> {
        self.systems.get(country).map(Vec::as_slice)
    }

    /// Country names in sorted order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.systems.keys().map(String::as_str)
    }
}
