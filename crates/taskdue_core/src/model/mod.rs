//! Value types shared by normalization, reconciliation and storage.
//!
//! # Responsibility
//! - Define the canonical due-date and priority shapes emitted by core.
//! - Define the stored task record the persistence layer round-trips.
//!
//! # Invariants
//! - A rendered `CanonicalDate` is always `YYYY-MM-DD` (4-2-2 ASCII digits).
//! - `DueDate::Unknown` renders as the reserved word `不明` and never collides
//!   with a rendered date.
//! - `PriorityLevel::Medium` is the default rank.

pub mod due;
pub mod priority;
pub mod task;
