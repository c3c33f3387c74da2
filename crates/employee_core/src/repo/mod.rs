//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data-access contract callers depend on.
//! - Isolate SQLite query text and parameter binding from service code.
//!
//! # Invariants
//! - Repository writes enforce `Employee::validate()` before persistence.
//! - Absence is an `Ok(None)` result; converting it into a failure belongs
//!   to the caller.

pub mod employee_repo;
pub mod structured_query;
