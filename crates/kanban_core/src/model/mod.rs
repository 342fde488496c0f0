//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical project (card) record and its checklist.
//! - Provide pure derivations used by every view: effective progress and
//!   D-day labels.
//!
//! # Invariants
//! - Every project is identified by a stable `ProjectId`.
//! - `order` is only comparable between projects sharing one `status`.
//! - `updated_at >= created_at` for every record produced by the store.

pub mod checklist;
pub mod dday;
pub mod project;
