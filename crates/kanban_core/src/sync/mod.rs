//! Remote synchronization for the networked board variant.
//!
//! Local state is authoritative and updated first; the mirror only ever
//! receives writes and never feeds anything back into the store.

pub mod mirror;
