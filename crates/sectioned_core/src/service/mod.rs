//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate record store writes and view re-derivation.
//! - Keep presentation layers decoupled from SQL details.

pub mod sample_service;
