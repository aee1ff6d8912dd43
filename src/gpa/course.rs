use anyhow::{Context, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Academic rigor tag of a course.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CourseWeight {
    #[default]
    Regular,
    Honors,
    Ap,
}

impl CourseWeight {
    /// Quality points added to a course in weighted mode
    pub fn bonus(self) -> f64 {
        match self {
            CourseWeight::Regular => 0.0,
            CourseWeight::Honors => 0.5,
            CourseWeight::Ap => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CourseWeight::Regular => "regular",
            CourseWeight::Honors => "honors",
            CourseWeight::Ap => "ap",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourseWeight::Regular => "Regular",
            CourseWeight::Honors => "Honors (+0.5)",
            CourseWeight::Ap => "AP/IB (+1.0)",
        }
    }
}

/// One line of a transcript.
///
/// `grade` and `credits` stay raw strings so that "not entered yet" (empty)
/// is distinguishable from a value that was entered but is wrong.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CourseRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub course: String,
    #[serde(default, deserialize_with = "raw_text")]
    pub grade: String,
    #[serde(default, deserialize_with = "raw_text")]
    pub credits: String,
    #[serde(default)]
    pub weight: CourseWeight,
}

impl CourseRow {
    pub fn new(course: &str, grade: &str, credits: &str, weight: CourseWeight) -> Self {
        Self {
            id: String::new(),
            course: course.to_string(),
            grade: grade.to_string(),
            credits: credits.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StudentDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub graduation_date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TranscriptStatus {
    #[serde(default = "default_true")]
    pub official: bool,
    #[serde(default = "default_true")]
    pub r#final: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TranscriptStatus {
    fn default() -> Self {
        Self {
            official: true,
            r#final: true,
        }
    }
}

impl TranscriptStatus {
    pub fn describe(&self) -> String {
        format!(
            "{}, {}",
            if self.official { "Official" } else { "Unofficial" },
            if self.r#final { "Final" } else { "In Progress" }
        )
    }
}

/// A transcript file: courses plus optional context for reports.
///
/// Example YAML:
/// ```yaml
/// school: Beijing No. 4 High School
/// courses:
///   - course: Mathematics
///     grade: 92
///     credits: 4
///     weight: honors
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Transcript {
    #[serde(default)]
    pub student: Option<StudentDetails>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub status: Option<TranscriptStatus>,
    #[serde(default)]
    pub courses: Vec<CourseRow>,
}

/// Load a transcript from disk. `.json` files are parsed as JSON, anything
/// else as YAML. Rows without an id get their 1-based position.
pub fn load_transcript(path: &Path) -> Result<Transcript> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript at {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut transcript: Transcript = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse transcript: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse transcript: invalid YAML in {}", path.display()))?
    };

    for (i, row) in transcript.courses.iter_mut().enumerate() {
        if row.id.is_empty() {
            row.id = (i + 1).to_string();
        }
    }

    Ok(transcript)
}

/// Accept a grade or credit value written either as text or as a number.
fn raw_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct RawText;

    impl<'de> Visitor<'de> for RawText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(RawText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_weight_bonus() {
        assert_eq!(CourseWeight::Regular.bonus(), 0.0);
        assert_eq!(CourseWeight::Honors.bonus(), 0.5);
        assert_eq!(CourseWeight::Ap.bonus(), 1.0);
    }

    #[test]
    fn test_weight_defaults_to_regular() {
        let row: CourseRow = serde_json::from_str(r#"{"course": "Art", "grade": "A", "credits": "1"}"#).unwrap();
        assert_eq!(row.weight, CourseWeight::Regular);
    }

    #[test]
    fn test_row_accepts_numeric_json_values() {
        let row: CourseRow =
            serde_json::from_str(r#"{"course": "Math", "grade": 92.5, "credits": 3, "weight": "ap"}"#)
                .unwrap();
        assert_eq!(row.grade, "92.5");
        assert_eq!(row.credits, "3");
        assert_eq!(row.weight, CourseWeight::Ap);
    }

    #[test]
    fn test_status_describe() {
        assert_eq!(TranscriptStatus::default().describe(), "Official, Final");
        let status = TranscriptStatus {
            official: false,
            r#final: false,
        };
        assert_eq!(status.describe(), "Unofficial, In Progress");
    }

    #[test]
    fn test_load_yaml_transcript() {
        let path = env::temp_dir().join("gpa_bro_test_transcript.yaml");
        std::fs::write(
            &path,
            r#"
school: Test High
student:
  full_name: Li Wei
status:
  official: false
courses:
  - course: Mathematics
    grade: "92"
    credits: "4"
    weight: honors
  - course: History
    grade: B
    credits: "3"
"#,
        )
        .unwrap();

        let transcript = load_transcript(&path).unwrap();
        assert_eq!(transcript.school.as_deref(), Some("Test High"));
        assert_eq!(transcript.student.unwrap().full_name, "Li Wei");
        let status = transcript.status.unwrap();
        assert!(!status.official);
        assert!(status.r#final);
        assert_eq!(transcript.courses.len(), 2);
        assert_eq!(transcript.courses[0].id, "1");
        assert_eq!(transcript.courses[0].weight, CourseWeight::Honors);
        assert_eq!(transcript.courses[1].grade, "B");
        assert_eq!(transcript.courses[1].id, "2");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_json_transcript() {
        let path = env::temp_dir().join("gpa_bro_test_transcript.json");
        std::fs::write(
            &path,
            r#"{"courses": [{"id": "x1", "course": "Physics", "grade": 88, "credits": 4.5}]}"#,
        )
        .unwrap();

        let transcript = load_transcript(&path).unwrap();
        assert!(transcript.student.is_none());
        assert_eq!(transcript.courses[0].id, "x1");
        assert_eq!(transcript.courses[0].grade, "88");
        assert_eq!(transcript.courses[0].credits, "4.5");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_transcript_missing_file() {
        let path = env::temp_dir().join("gpa_bro_test_transcript_missing.yaml");
        let _ = std::fs::remove_file(&path);
        let err = load_transcript(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read transcript"));
    }
}
