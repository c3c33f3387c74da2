//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the translation from absent lookups to `ResourceNotFound`.

pub mod employee_service;
