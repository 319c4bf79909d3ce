//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into session-level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod celebration;
pub mod challenge_service;
