use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::formatter::sort_scale;
use crate::gpa::{course_points, summarize, CourseWeight, StudentDetails, Transcript};
use crate::grading::GradeDefinition;

pub const REPORT_VERSION: u32 = 1;

/// Academic report: the evaluated transcript with its scale and GPA.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub student: StudentDetails,
    #[serde(default)]
    pub school: Option<String>,
    pub transcript_status: String,
    pub country: String,
    #[serde(default)]
    pub grading_mode: Option<String>,
    pub total_courses: usize,
    pub total_credits: f64,
    pub unweighted_gpa: Option<f64>,
    pub weighted_gpa: Option<f64>,
    /// Why the GPA is missing, when something was entered but did not resolve
    #[serde(default)]
    pub error: Option<String>,
    pub scale: Vec<ReportScaleRow>,
    pub courses: Vec<ReportCourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportScaleRow {
    pub scale: String,
    pub local_grade: Option<String>,
    pub us_grade: Option<String>,
    pub points: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportCourse {
    pub course: String,
    pub credits: String,
    pub grade: String,
    pub weight: CourseWeight,
    /// Unweighted quality points; 0 when the grade does not resolve
    pub points: f64,
}

/// Evaluate a transcript against a grading scale.
///
/// Per-course points come from the same resolver as the GPA so the two
/// always agree.
pub fn build_report(
    transcript: &Transcript,
    country: &str,
    grading_mode: Option<&str>,
    definitions: &[GradeDefinition],
    generated_at: DateTime<Utc>,
) -> Report {
    let summary = summarize(&transcript.courses, definitions);

    let error = summary
        .unweighted
        .error
        .as_ref()
        .filter(|_| !summary.unweighted.is_empty())
        .map(ToString::to_string);

    let scale = sort_scale(definitions)
        .into_iter()
        .map(|d| ReportScaleRow {
            scale: d.range_label(),
            local_grade: d.local_grade.clone(),
            us_grade: d.us_grade_letter.clone(),
            points: d.grade_points,
            description: d.description.clone(),
        })
        .collect();

    let courses = transcript
        .courses
        .iter()
        .map(|c| ReportCourse {
            course: c.course.clone(),
            credits: c.credits.clone(),
            grade: c.grade.clone(),
            weight: c.weight,
            points: course_points(c, definitions).unwrap_or(0.0),
        })
        .collect();

    Report {
        version: REPORT_VERSION,
        generated_at,
        student: transcript.student.clone().unwrap_or_default(),
        school: transcript.school.clone(),
        transcript_status: transcript.status.clone().unwrap_or_default().describe(),
        country: country.to_string(),
        grading_mode: grading_mode.filter(|m| !m.is_empty()).map(str::to_string),
        total_courses: transcript.courses.len(),
        total_credits: summary.unweighted.total_credits,
        unweighted_gpa: summary.unweighted.gpa,
        weighted_gpa: summary.weighted.gpa,
        error,
        scale,
        courses,
    }
}

/// Save a report as pretty JSON, atomically
///
/// Uses atomic-write-file so a half-written report never replaces an
/// existing one. Creates the parent directory if it doesn't exist.
pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit().context("Failed to save report")?;

    Ok(())
}
