//! Board state container.
//!
//! # Responsibility
//! - Hold the authoritative project collection for one board.
//! - Keep callers away from direct mutation of project records.
//!
//! # See also
//! - `sync::mirror` for the outbound remote channel.

pub mod project_store;
