//! Repository layer: parcel storage contracts and the SQLite implementation.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidState`) in
//!   addition to backend errors.

pub mod parcel_repo;
