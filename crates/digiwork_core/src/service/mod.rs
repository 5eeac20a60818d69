//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and codec calls into use-case level APIs.
//! - Convert every underlying failure into a categorized, readable error.
//! - Keep UI/FFI layers decoupled from storage and file-format details.

pub mod directory_service;
pub mod import_service;
pub mod merge_service;
pub mod session;
