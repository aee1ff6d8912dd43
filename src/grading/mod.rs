pub mod defaults;
pub mod registry;
pub mod source;
pub mod types;

pub use registry::GradingRegistry;
pub use source::{load_definitions, load_registry, read_rows_file, DataSource};
pub use types::{GradeDefinition, GradeRow, GradingTable};
