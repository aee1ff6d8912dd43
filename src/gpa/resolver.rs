use thiserror::Error;

use super::grade::RawGrade;
use crate::grading::GradeDefinition;

/// A grade that matched no band and no letter of the selected scale.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("grade '{grade}' not found in grading scale")]
pub struct GradeNotFound {
    pub grade: String,
}

/// Find the definition a reported grade resolves to.
///
/// Numeric input: first band containing the value. Symbolic input: first
/// exact, case-sensitive match on the local grade or the U.S. letter.
/// Table order decides between overlapping candidates.
pub fn resolve_definition<'a>(
    raw: &str,
    definitions: &'a [GradeDefinition],
) -> Option<&'a GradeDefinition> {
    match RawGrade::parse(raw) {
        RawGrade::Numeric(value) => definitions.iter().find(|d| d.contains(value)),
        RawGrade::Symbolic(text) => definitions.iter().find(|d| {
            d.local_grade.as_deref() == Some(text.as_str())
                || d.us_grade_letter.as_deref() == Some(text.as_str())
        }),
    }
}

/// Resolve a reported grade to its quality points.
pub fn resolve(raw: &str, definitions: &[GradeDefinition]) -> Result<f64, GradeNotFound> {
    resolve_definition(raw, definitions)
        .map(|d| d.grade_points)
        .ok_or_else(|| GradeNotFound {
            grade: raw.to_string(),
        })
}
