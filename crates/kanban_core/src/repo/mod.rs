//! Persistence boundary for the remote project table.
//!
//! # Responsibility
//! - Define the row-store contract the store mirrors into.
//! - Isolate record/row naming translation from the core record shape.
//!
//! # Invariants
//! - The in-memory `Project` never carries remote-only columns (`user_id`).
//! - Column names only reach SQL through the `ProjectField` table.

pub mod project_repo;
pub mod row_mapping;
