use owo_colors::OwoColorize;
use std::cmp::Ordering;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::gpa::{course_points, CourseRow, GpaSummary};
use crate::grading::GradeDefinition;

// Display order for UK GCSE letter grades
const GCSE_ORDER: &[&str] = &["A*", "A", "B", "C", "D", "E", "F", "G", "U"];

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// GPA rounded for display; absent values show as "0.00"
pub fn format_gpa(gpa: Option<f64>) -> String {
    format!("{:.2}", gpa.unwrap_or(0.0))
}

/// Points column value: two decimals, or "-" when the grade does not resolve
fn format_points(points: Option<f64>) -> String {
    points
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "-".to_string())
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a course name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Format courses as a table: index, course, credits, grade, weight, points.
/// Points are unweighted quality points from the same resolver as the GPA.
pub fn format_course_table(
    courses: &[CourseRow],
    definitions: &[GradeDefinition],
    use_colors: bool,
) -> String {
    if courses.is_empty() {
        return "No courses entered.".to_string();
    }

    // Index 3 + credits 7 + grade 8 + weight 13 + points 6 + separators
    let fixed_width = 3 + 2 + 7 + 2 + 8 + 2 + 13 + 2 + 6 + 2;
    let longest = courses
        .iter()
        .map(|c| c.course.chars().count())
        .max()
        .unwrap_or(0)
        .max("Course".len());
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    let header = format!(
        "{}  {}  {:>7}  {:>8}  {}  {:>6}",
        "   ",
        pad("Course", name_width),
        "Credits",
        "Grade",
        pad("Weight", 13),
        "Points"
    );

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (idx, course) in courses.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let name = pad(&truncate_name(&course.course, name_width), name_width);
        let points = if course.grade.is_empty() {
            "-".to_string()
        } else {
            format_points(course_points(course, definitions))
        };
        let points_str = format!("{:>6}", points);

        if use_colors {
            let points_cell = if points == "-" && !course.grade.is_empty() {
                points_str.red().to_string()
            } else {
                points_str
            };
            lines.push(format!(
                "{}  {}  {:>7}  {:>8}  {}  {}",
                index_str.dimmed(),
                name,
                course.credits,
                course.grade.cyan(),
                pad(course.weight.label(), 13),
                points_cell
            ));
        } else {
            lines.push(format!(
                "{}  {}  {:>7}  {:>8}  {}  {}",
                index_str,
                name,
                course.credits,
                course.grade,
                pad(course.weight.label(), 13),
                points_str
            ));
        }
    }

    lines.join("\n")
}

/// Format the GPA summary block
pub fn format_summary(summary: &GpaSummary, use_colors: bool) -> String {
    let unweighted = format_gpa(summary.unweighted.gpa);
    let weighted = format_gpa(summary.weighted.gpa);
    let credits = format!("{:.2}", summary.unweighted.total_credits);

    let mut lines = if use_colors {
        vec![
            format!("Unweighted GPA:     {}", unweighted.bold()),
            format!("Weighted GPA:       {}", weighted.bold().green()),
            format!("Total Credit Hours: {}", credits),
        ]
    } else {
        vec![
            format!("Unweighted GPA:     {}", unweighted),
            format!("Weighted GPA:       {}", weighted),
            format!("Total Credit Hours: {}", credits),
        ]
    };

    // "Nothing entered" is not worth a message
    if let Some(ref error) = summary.unweighted.error {
        if !summary.unweighted.is_empty() {
            let note = format!("Note: {}", error);
            lines.push(if use_colors { note.red().to_string() } else { note });
        }
    }

    lines.join("\n")
}

fn is_uk_gcse(definitions: &[GradeDefinition]) -> bool {
    definitions
        .iter()
        .any(|d| d.country == "United Kingdom" && d.grading_mode.contains("GCSE"))
}

fn gcse_rank(definition: &GradeDefinition) -> Option<usize> {
    let local = definition.local_grade.as_deref()?;
    GCSE_ORDER.iter().position(|g| *g == local)
}

fn cmp_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Order a scale for display: highest band first.
///
/// Ties fall through range max, range min, points, then local grade. UK GCSE
/// scales follow the conventional A*, A, B ... U order instead.
pub fn sort_scale(definitions: &[GradeDefinition]) -> Vec<&GradeDefinition> {
    let mut sorted: Vec<&GradeDefinition> = definitions.iter().collect();

    if is_uk_gcse(definitions) {
        // Unlisted grades go after the known ones, best first
        sorted.sort_by(|a, b| {
            let rank_a = gcse_rank(a).unwrap_or(GCSE_ORDER.len());
            let rank_b = gcse_rank(b).unwrap_or(GCSE_ORDER.len());
            rank_a
                .cmp(&rank_b)
                .then_with(|| cmp_desc(a.grade_points, b.grade_points))
                .then_with(|| cmp_desc(a.range_max, b.range_max))
                .then_with(|| cmp_desc(a.range_min, b.range_min))
        });
        return sorted;
    }

    sorted.sort_by(|a, b| {
        cmp_desc(a.range_max, b.range_max)
            .then_with(|| cmp_desc(a.range_min, b.range_min))
            .then_with(|| cmp_desc(a.grade_points, b.grade_points))
            .then_with(|| b.local_grade.cmp(&a.local_grade))
    });
    sorted
}

/// Format a grading scale: range, local grade, U.S. letter, points,
/// description. Attention notes and extra scale info frame the table.
pub fn format_grade_scale(definitions: &[GradeDefinition], use_colors: bool) -> String {
    if definitions.is_empty() {
        return "No grading scale available.".to_string();
    }

    let sorted = sort_scale(definitions);
    let show_local = sorted.iter().any(|d| d.local_grade.is_some());

    let mut lines = Vec::new();

    if let Some(attention) = definitions[0].attention.as_deref() {
        let note = format!("Important Note: {}", attention);
        lines.push(if use_colors { note.yellow().to_string() } else { note });
        lines.push(String::new());
    }

    let header = if show_local {
        format!("{:<14}{:<12}{:<10}{:>6}  {}", "Scale", "Local Grade", "U.S. Grade", "Points", "Description")
    } else {
        format!("{:<14}{:<10}{:>6}  {}", "Scale", "U.S. Grade", "Points", "Description")
    };
    lines.push(if use_colors { header.bold().to_string() } else { header });

    for d in sorted {
        let local = d.local_grade.as_deref().unwrap_or("-");
        let letter = d.us_grade_letter.as_deref().unwrap_or("-");
        let description = d.description.as_deref().unwrap_or("");
        let points = format!("{:.2}", d.grade_points);
        let line = if show_local {
            format!("{:<14}{:<12}{:<10}{:>6}  {}", d.range_label(), local, letter, points, description)
        } else {
            format!("{:<14}{:<10}{:>6}  {}", d.range_label(), letter, points, description)
        };
        lines.push(line.trim_end().to_string());
    }

    if let Some(info) = definitions[0].additional_scale_info.as_deref() {
        lines.push(String::new());
        lines.push(if use_colors { info.dimmed().to_string() } else { info.to_string() });
    }

    lines.join("\n")
}

/// Format courses as tab-separated values for scripting
/// Columns: course, credits, grade, weight, points (no headers, no colors)
pub fn format_tsv(courses: &[CourseRow], definitions: &[GradeDefinition]) -> String {
    courses
        .iter()
        .map(|course| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                course.course,
                course.credits,
                course.grade,
                course.weight.as_str(),
                format_points(course_points(course, definitions))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
