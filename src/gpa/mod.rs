pub mod course;
pub mod engine;
pub mod grade;
pub mod resolver;
pub mod validation;

pub use course::{load_transcript, CourseRow, CourseWeight, StudentDetails, Transcript, TranscriptStatus};
pub use engine::{aggregate, course_points, summarize, AggregationError, AggregationResult, GpaSummary};
pub use grade::RawGrade;
pub use resolver::{resolve, resolve_definition, GradeNotFound};
pub use validation::{validate_course, validate_courses, validate_credits, validate_grade, CourseIssues};
