//! SQLite connection bootstrap and the `tasks` schema.
//!
//! # Responsibility
//! - Open task databases with the pragmas core relies on.
//! - Bring the `tasks` table to the current shape, including databases left
//!   behind by the earlier integer-keyed task store.
//!
//! Failures are reported as `RepoError`, the same surface task reads and
//! writes use.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
