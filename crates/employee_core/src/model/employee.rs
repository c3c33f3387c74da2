//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record shared by repository and service layers.
//! - Reject blank required fields before they reach storage.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first insert.
//! - `first_name`, `last_name` and `email` are never blank once validated.
//! - `email` is expected to be unique, but storage does not enforce it.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated primary key of an employee row.
pub type EmployeeId = i64;

/// Persisted (or about to be persisted) employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// `None` for unsaved records.
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Field-level validation failure for [`Employee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeValidationError {
    BlankFirstName,
    BlankLastName,
    BlankEmail,
    /// Store ids start at 1.
    NonPositiveId(EmployeeId),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFirstName => write!(f, "employee first name must not be blank"),
            Self::BlankLastName => write!(f, "employee last name must not be blank"),
            Self::BlankEmail => write!(f, "employee email must not be blank"),
            Self::NonPositiveId(id) => write!(f, "employee id must be positive, got {id}"),
        }
    }
}

impl Error for EmployeeValidationError {}

impl Employee {
    /// Creates an unsaved employee.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Returns whether the store has assigned an id to this record.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Checks required fields.
    ///
    /// # Errors
    /// - Returns the first blank field found, in declaration order.
    /// - Returns `NonPositiveId` when a present id is zero or negative.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(EmployeeValidationError::NonPositiveId(id));
            }
        }
        if self.first_name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankLastName);
        }
        if self.email.trim().is_empty() {
            return Err(EmployeeValidationError::BlankEmail);
        }
        Ok(())
    }
}
