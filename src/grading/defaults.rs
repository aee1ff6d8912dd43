use super::types::{GradeDefinition, GradingTable};

// (local grade, U.S. letter, min, max, points, description)
type Band = (&'static str, &'static str, f64, f64, f64, &'static str);

const UNITED_STATES: &[Band] = &[
    ("A", "A", 93.0, 100.0, 4.0, "Excellent"),
    ("A-", "A-", 90.0, 92.99, 3.7, "Very Good"),
    ("B+", "B+", 87.0, 89.99, 3.3, "Good"),
    ("B", "B", 83.0, 86.99, 3.0, "Above Average"),
    ("B-", "B-", 80.0, 82.99, 2.7, "Average"),
    ("C+", "C+", 77.0, 79.99, 2.3, "Below Average"),
    ("C", "C", 73.0, 76.99, 2.0, "Fair"),
    ("C-", "C-", 70.0, 72.99, 1.7, "Poor"),
    ("D+", "D+", 67.0, 69.99, 1.3, "Very Poor"),
    ("D", "D", 63.0, 66.99, 1.0, "Passing"),
    ("F", "F", 0.0, 62.99, 0.0, "Failing"),
];

const CHINA: &[Band] = &[
    ("90-100", "A", 90.0, 100.0, 4.0, "Excellent"),
    ("80-89", "B", 80.0, 89.0, 3.0, "Good"),
    ("70-79", "C", 70.0, 79.0, 2.0, "Average"),
    ("60-69", "D", 60.0, 69.0, 1.0, "Pass"),
    ("0-59", "F", 0.0, 59.0, 0.0, "Fail"),
];

const CHINA_ATTENTION: &str = "Chinese numeric grading system uses a 100-point scale. \
Enter the exact numeric grade received (e.g., 85).";

fn bands(country: &str, mode: &str, bands: &[Band]) -> Vec<GradeDefinition> {
    bands
        .iter()
        .map(|&(local, letter, min, max, points, description)| GradeDefinition {
            country: country.to_string(),
            grading_mode: mode.to_string(),
            local_grade: Some(local.to_string()),
            us_grade_letter: Some(letter.to_string()),
            range_min: min,
            range_max: max,
            grade_points: points,
            description: Some(description.to_string()),
            attention: None,
            additional_scale_info: None,
        })
        .collect()
}

impl GradingTable {
    /// Baseline grading systems used whenever no other data is available.
    ///
    /// Covers the standard U.S. letter scale and the Chinese 100-point scale.
    pub fn builtin() -> Self {
        let mut china = bands("China", "Numeric grade", CHINA);
        if let Some(first) = china.first_mut() {
            first.attention = Some(CHINA_ATTENTION.to_string());
        }

        GradingTable::from_definitions(
            bands("United States", "Standard", UNITED_STATES)
                .into_iter()
                .chain(china),
        )
    }
}
