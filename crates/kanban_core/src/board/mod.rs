//! Derived board views.
//!
//! # Responsibility
//! - Compose search/tag/priority filters over the project collection.
//! - Group visible projects into columns sorted by `order`.
//! - Resolve drag-and-drop drops into store mutations.
//!
//! # Invariants
//! - Views are recomputed from store state on every read; nothing here owns
//!   project data.
//! - Column sorting is stable: projects sharing an `order` keep collection
//!   order.

pub mod drag;
pub mod filter;
pub mod view;
