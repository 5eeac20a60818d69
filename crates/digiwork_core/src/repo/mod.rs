//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must call `NewPerson::validate()` before persistence.
//! - Unique-key violations surface as semantic errors, not raw SQLite codes.

pub mod person_repo;
