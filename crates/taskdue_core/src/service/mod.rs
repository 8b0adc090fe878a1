//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate analyzer, reconciler and repository calls into use cases.
//! - Keep CLI callers decoupled from storage details.

pub mod task_service;
