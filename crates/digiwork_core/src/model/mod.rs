//! Domain model for the person directory.
//!
//! # Responsibility
//! - Define the persisted person record and its insert payload.
//!
//! # Invariants
//! - Every stored person is identified by a store-generated `PersonId`.
//! - Records are append-only: no update or delete path exists.

pub mod person;
