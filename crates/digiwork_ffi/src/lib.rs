//! UI bridge for DigiWork core.
//!
//! Exposes use-case functions with plain response envelopes so the desktop
//! shell never handles Rust error types directly.

pub mod api;
pub mod config;
