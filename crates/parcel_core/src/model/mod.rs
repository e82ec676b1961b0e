//! Domain model for parcel tracking.
//!
//! # Responsibility
//! - Define the canonical parcel record used by store and service layers.
//!
//! # Invariants
//! - Every persisted parcel is identified by a storage-assigned number.
//! - Status values outside the known lifecycle are unrepresentable.

pub mod parcel;
