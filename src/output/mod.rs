pub mod formatter;
pub mod report;

pub use formatter::{
    format_course_table, format_gpa, format_grade_scale, format_summary, format_tsv,
    should_use_colors, sort_scale,
};
pub use report::{build_report, save_report, Report, ReportCourse, ReportScaleRow};
