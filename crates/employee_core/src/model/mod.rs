//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the canonical record persisted in the `employees` table.
//! - Keep field-level validation next to the data it guards.
//!
//! # Invariants
//! - An employee without an id has never been persisted.
//! - Once assigned by the store, an id is never changed or reused.

pub mod employee;
