//! Convert international academic records to a U.S.-style GPA.
//!
//! Grading systems are loaded into a [`grading::GradingRegistry`], narrowed to
//! one country (and optionally one grading mode), and used to resolve each
//! course's reported grade into quality points. [`gpa::aggregate`] turns a
//! course list into a credit-weighted GPA.

pub mod config;
pub mod gpa;
pub mod grading;
pub mod output;
