use thiserror::Error;
use tracing::debug;

use super::course::CourseRow;
use super::grade::parse_number;
use super::resolver::resolve;
use crate::grading::GradeDefinition;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("No valid courses found")]
    NoValidCourses,

    #[error("Invalid grade for course: {course}")]
    InvalidGrade { course: String, grade: String },

    #[error("Total credits cannot be zero")]
    ZeroCredits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    /// None whenever no course counted or any course failed to resolve
    pub gpa: Option<f64>,
    pub total_credits: f64,
    pub error: Option<AggregationError>,
}

impl AggregationResult {
    fn failed(error: AggregationError) -> Self {
        Self {
            gpa: None,
            total_credits: 0.0,
            error: Some(error),
        }
    }

    /// True when the only problem is that nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        matches!(self.error, Some(AggregationError::NoValidCourses))
    }
}

/// Unweighted and weighted results for the same course list.
#[derive(Debug, Clone, PartialEq)]
pub struct GpaSummary {
    pub unweighted: AggregationResult,
    pub weighted: AggregationResult,
}

/// Parsed credits for a row that counts toward the GPA.
///
/// Rows with an empty grade, empty credits, or non-positive credits are
/// treated as not yet entered.
fn counted_credits(course: &CourseRow) -> Option<f64> {
    if course.grade.is_empty() || course.credits.is_empty() {
        return None;
    }
    parse_number(&course.credits).filter(|c| *c > 0.0)
}

/// Credit-weighted GPA over a course list.
///
/// Fails fast: the first unresolvable grade discards everything accumulated
/// so far. In weighted mode each course's rigor bonus is added to its
/// quality points before weighting by credits.
pub fn aggregate(
    courses: &[CourseRow],
    definitions: &[GradeDefinition],
    weighted: bool,
) -> AggregationResult {
    let counted: Vec<(&CourseRow, f64)> = courses
        .iter()
        .filter_map(|c| counted_credits(c).map(|credits| (c, credits)))
        .collect();

    if counted.is_empty() {
        return AggregationResult::failed(AggregationError::NoValidCourses);
    }

    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for (course, credits) in counted {
        let points = match resolve(&course.grade, definitions) {
            Ok(points) => points,
            Err(e) => {
                debug!("Course '{}' did not resolve: {}", course.course, e);
                return AggregationResult::failed(AggregationError::InvalidGrade {
                    course: course.course.clone(),
                    grade: e.grade,
                });
            }
        };

        let bonus = if weighted { course.weight.bonus() } else { 0.0 };
        total_points += credits * (points + bonus);
        total_credits += credits;
    }

    if total_credits == 0.0 {
        return AggregationResult::failed(AggregationError::ZeroCredits);
    }

    AggregationResult {
        gpa: Some(total_points / total_credits),
        total_credits,
        error: None,
    }
}

pub fn summarize(courses: &[CourseRow], definitions: &[GradeDefinition]) -> GpaSummary {
    GpaSummary {
        unweighted: aggregate(courses, definitions, false),
        weighted: aggregate(courses, definitions, true),
    }
}

/// Unweighted quality points for a single row, through the same resolver
/// the aggregate uses. None when the grade does not resolve.
pub fn course_points(course: &CourseRow, definitions: &[GradeDefinition]) -> Option<f64> {
    resolve(&course.grade, definitions).ok()
}
