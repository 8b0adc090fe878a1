//! Pure normalizers for analyzer output and user input.
//!
//! # Responsibility
//! - Turn raw due-date text into a `DueDate` relative to a caller-supplied
//!   reference day.
//! - Turn raw priority text into a `PriorityLevel`.
//!
//! # Invariants
//! - Both normalizers are total: every `&str` maps to a value, nothing panics.
//! - No clock reads, no I/O, no logging. Output depends only on arguments.

pub mod date;
pub mod priority;
