use super::course::CourseRow;
use super::grade::{parse_number, RawGrade};
use crate::grading::GradeDefinition;

const MAX_CREDITS: f64 = 12.0;

/// Check a raw credit-hour value.
///
/// Empty input is "not filled in yet" and passes.
pub fn validate_credits(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let credits = match parse_number(raw) {
        Some(v) => v,
        None => return Some("Must be a number".to_string()),
    };
    if credits <= 0.0 {
        return Some("Must be greater than 0".to_string());
    }
    if credits > MAX_CREDITS {
        return Some("Must be 12 or less".to_string());
    }
    let doubled = credits * 2.0;
    if doubled.round() != doubled {
        return Some("Must be in 0.5 increments".to_string());
    }

    None
}

/// Check a raw grade against the selected scale.
///
/// More permissive than the resolver: letters compare case-insensitively and
/// only against the U.S. letter column. On failure the message lists every
/// accepted range and letter.
pub fn validate_grade(raw: &str, definitions: &[GradeDefinition]) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if definitions.is_empty() {
        return Some("Select a country first".to_string());
    }

    let in_band = match RawGrade::parse(raw) {
        RawGrade::Numeric(value) => definitions.iter().any(|d| d.contains(value)),
        RawGrade::Symbolic(_) => false,
    };

    let letter = raw.trim().to_uppercase();
    let letter_match = definitions.iter().any(|d| {
        d.us_grade_letter
            .as_deref()
            .map(|l| l.to_uppercase() == letter)
            .unwrap_or(false)
    });

    if in_band || letter_match {
        return None;
    }

    let mut ranges: Vec<String> = Vec::new();
    for d in definitions {
        let range = format!("{}-{}", d.range_min, d.range_max);
        if !ranges.contains(&range) {
            ranges.push(range);
        }
    }

    let mut letters: Vec<&str> = Vec::new();
    for l in definitions
        .iter()
        .filter_map(|d| d.us_grade_letter.as_deref())
        .filter(|l| !l.is_empty())
    {
        if !letters.contains(&l) {
            letters.push(l);
        }
    }

    Some(format!(
        "Invalid grade. Use {} or {}",
        ranges.join(", "),
        letters.join(", ")
    ))
}

/// Field errors for one course row.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseIssues {
    /// 1-based position in the course list
    pub row: usize,
    pub course: String,
    pub credits: Option<String>,
    pub grade: Option<String>,
}

impl CourseIssues {
    pub fn is_empty(&self) -> bool {
        self.credits.is_none() && self.grade.is_none()
    }

    /// One message per failing field, e.g. "row 2 (History) credits: Must be 12 or less"
    pub fn messages(&self) -> Vec<String> {
        let name = if self.course.is_empty() {
            "unnamed"
        } else {
            self.course.as_str()
        };
        let mut out = Vec::new();
        if let Some(ref e) = self.credits {
            out.push(format!("row {} ({}) credits: {}", self.row, name, e));
        }
        if let Some(ref e) = self.grade {
            out.push(format!("row {} ({}) grade: {}", self.row, name, e));
        }
        out
    }
}

pub fn validate_course(row: usize, course: &CourseRow, definitions: &[GradeDefinition]) -> CourseIssues {
    CourseIssues {
        row,
        course: course.course.clone(),
        credits: validate_credits(&course.credits),
        grade: validate_grade(&course.grade, definitions),
    }
}

/// Validate every row, returning all issues at once (not just the first).
pub fn validate_courses(
    courses: &[CourseRow],
    definitions: &[GradeDefinition],
) -> Result<(), Vec<CourseIssues>> {
    let issues: Vec<CourseIssues> = courses
        .iter()
        .enumerate()
        .map(|(i, course)| validate_course(i + 1, course, definitions))
        .filter(|issues| !issues.is_empty())
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpa::course::CourseWeight;

    fn band(local: &str, letter: Option<&str>, min: f64, max: f64, points: f64) -> GradeDefinition {
        GradeDefinition {
            country: "Test".to_string(),
            grading_mode: "Standard".to_string(),
            local_grade: Some(local.to_string()),
            us_grade_letter: letter.map(str::to_string),
            range_min: min,
            range_max: max,
            grade_points: points,
            description: None,
            attention: None,
            additional_scale_info: None,
        }
    }

    fn sample_scale() -> Vec<GradeDefinition> {
        vec![
            band("A", Some("A"), 93.0, 100.0, 4.0),
            band("B", Some("B"), 83.0, 86.99, 3.0),
        ]
    }

    #[test]
    fn test_credits_valid() {
        assert_eq!(validate_credits("3"), None);
        assert_eq!(validate_credits("0.5"), None);
        assert_eq!(validate_credits("4.5"), None);
        assert_eq!(validate_credits("12"), None);
    }

    #[test]
    fn test_credits_empty_is_not_an_error() {
        assert_eq!(validate_credits(""), None);
    }

    #[test]
    fn test_credits_not_a_number() {
        assert_eq!(validate_credits("abc"), Some("Must be a number".to_string()));
    }

    #[test]
    fn test_credits_read_leading_number() {
        assert_eq!(validate_credits("3h"), None);
        assert_eq!(validate_credits("3 credits"), None);
        assert_eq!(validate_credits("1,0"), None);
        assert_eq!(validate_credits("h3"), Some("Must be a number".to_string()));
    }

    #[test]
    fn test_credits_zero_or_negative() {
        assert_eq!(validate_credits("0"), Some("Must be greater than 0".to_string()));
        assert_eq!(validate_credits("-1"), Some("Must be greater than 0".to_string()));
    }

    #[test]
    fn test_credits_over_max() {
        assert_eq!(validate_credits("12.5"), Some("Must be 12 or less".to_string()));
    }

    #[test]
    fn test_credits_half_steps() {
        assert_eq!(
            validate_credits("1.25"),
            Some("Must be in 0.5 increments".to_string())
        );
    }

    #[test]
    fn test_grade_empty_is_not_an_error() {
        assert_eq!(validate_grade("", &sample_scale()), None);
        assert_eq!(validate_grade("", &[]), None);
    }

    #[test]
    fn test_grade_requires_country() {
        assert_eq!(validate_grade("A", &[]), Some("Select a country first".to_string()));
    }

    #[test]
    fn test_grade_numeric_in_band() {
        assert_eq!(validate_grade("95", &sample_scale()), None);
    }

    #[test]
    fn test_grade_numeric_with_suffix() {
        assert_eq!(validate_grade("95%", &sample_scale()), None);
        assert!(validate_grade("90%", &sample_scale()).is_some());
    }

    #[test]
    fn test_grade_letter_case_insensitive() {
        assert_eq!(validate_grade("a", &sample_scale()), None);
        assert_eq!(validate_grade(" b ", &sample_scale()), None);
    }

    #[test]
    fn test_grade_ignores_local_grade_column() {
        let scale = vec![band("Sehr gut", Some("A"), 1.0, 1.5, 4.0)];
        assert!(validate_grade("Sehr gut", &scale).is_some());
    }

    #[test]
    fn test_grade_error_lists_vocabulary() {
        let err = validate_grade("Z", &sample_scale()).unwrap();
        assert_eq!(err, "Invalid grade. Use 93-100, 83-86.99 or A, B");
    }

    #[test]
    fn test_grade_error_deduplicates() {
        let scale = vec![
            band("A", Some("A"), 90.0, 100.0, 4.0),
            band("A+", Some("A"), 90.0, 100.0, 4.0),
            band("P", None, 50.0, 89.0, 2.0),
            band("E", Some(""), 0.0, 49.0, 0.0),
        ];
        let err = validate_grade("Q", &scale).unwrap();
        assert_eq!(err, "Invalid grade. Use 90-100, 50-89, 0-49 or A");
    }

    #[test]
    fn test_blank_grade_never_matches_empty_letter_column() {
        let row = crate::grading::GradeRow {
            country_name: "Test".to_string(),
            grading_mode: "Standard".to_string(),
            local_grade: Some("P".to_string()),
            us_grade_letter: Some(String::new()),
            grade_range_min: Some(50.0),
            grade_range_max: Some(100.0),
            grade_points: 2.0,
            grade_description: None,
            attention: None,
            additional_scale_info: None,
        };
        let scale = vec![GradeDefinition::from(row)];
        assert!(scale[0].us_grade_letter.is_none());
        assert!(validate_grade("  ", &scale).is_some());
    }

    #[test]
    fn test_grade_numeric_out_of_band() {
        assert!(validate_grade("90", &sample_scale()).is_some());
    }

    #[test]
    fn test_validate_courses_collects_all_issues() {
        let courses = vec![
            CourseRow::new("Math", "A", "3", CourseWeight::Regular),
            CourseRow::new("Art", "Z", "13", CourseWeight::Regular),
            CourseRow::new("", "", "", CourseWeight::Regular),
            CourseRow::new("Music", "B", "1.25", CourseWeight::Honors),
        ];
        let issues = validate_courses(&courses, &sample_scale()).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].row, 2);
        assert!(issues[0].credits.is_some());
        assert!(issues[0].grade.is_some());
        assert_eq!(issues[1].row, 4);
        assert!(issues[1].grade.is_none());
        assert_eq!(
            issues[1].messages(),
            vec!["row 4 (Music) credits: Must be in 0.5 increments".to_string()]
        );
    }

    #[test]
    fn test_validate_courses_ok() {
        let courses = vec![CourseRow::new("Math", "95", "3", CourseWeight::Ap)];
        assert!(validate_courses(&courses, &sample_scale()).is_ok());
    }
}
