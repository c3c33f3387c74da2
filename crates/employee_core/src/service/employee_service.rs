//! Employee use-case service.
//!
//! # Responsibility
//! - Provide caller-facing CRUD entry points over any `EmployeeRepository`.
//! - Turn repository absence into `ResourceNotFound` where the use-case
//!   requires the employee to exist.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::error::ResourceNotFound;
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, RepoError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum ServiceError {
    ResourceNotFound(ResourceNotFound),
    /// Another employee already uses this email.
    EmailTaken(String),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound(err) => write!(f, "{err}"),
            Self::EmailTaken(email) => {
                write!(f, "employee already exists with given email: {email}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ResourceNotFound(err) => Some(err),
            Self::EmailTaken(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ResourceNotFound> for ServiceError {
    fn from(value: ResourceNotFound) -> Self {
        Self::ResourceNotFound(value)
    }
}

/// Query-authoring style used for a first/last name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameQueryStyle {
    StructuredPositional,
    StructuredNamed,
    NativePositional,
    NativeNamed,
}

impl NameQueryStyle {
    pub const ALL: [NameQueryStyle; 4] = [
        Self::StructuredPositional,
        Self::StructuredNamed,
        Self::NativePositional,
        Self::NativeNamed,
    ];

    /// Stable label used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StructuredPositional => "structured_positional",
            Self::StructuredNamed => "structured_named",
            Self::NativePositional => "native_positional",
            Self::NativeNamed => "native_named",
        }
    }
}

/// Replacement values for an existing employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Use-case service wrapper for employee operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists an employee.
    ///
    /// # Contract
    /// - Rejects an email used by any other stored employee.
    /// - Returns the saved record with its id.
    pub fn save_employee(&self, employee: &Employee) -> ServiceResult<Employee> {
        self.ensure_email_free(employee)?;
        Ok(self.repo.save(employee)?)
    }

    pub fn get_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.repo.find_all()?)
    }

    /// Gets one employee by id, failing with `ResourceNotFound` when absent.
    pub fn get_employee_by_id(&self, id: EmployeeId) -> ServiceResult<Employee> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| not_found_by_id(id).into())
    }

    /// Overwrites names and email of an existing employee.
    pub fn update_employee(
        &self,
        id: EmployeeId,
        update: &EmployeeUpdate,
    ) -> ServiceResult<Employee> {
        let mut employee = self.get_employee_by_id(id)?;
        employee.first_name = update.first_name.clone();
        employee.last_name = update.last_name.clone();
        employee.email = update.email.clone();
        self.ensure_email_free(&employee)?;
        Ok(self.repo.save(&employee)?)
    }

    /// Deletes an existing employee, failing with `ResourceNotFound` when absent.
    pub fn delete_employee(&self, id: EmployeeId) -> ServiceResult<()> {
        self.get_employee_by_id(id)?;
        Ok(self.repo.delete_by_id(id)?)
    }

    /// Looks an employee up by first and last name using `style`.
    pub fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        style: NameQueryStyle,
    ) -> ServiceResult<Employee> {
        let found = match style {
            NameQueryStyle::StructuredPositional => self.repo.find_by_jpql(first_name, last_name)?,
            NameQueryStyle::StructuredNamed => {
                self.repo.find_by_jpql_named_params(first_name, last_name)?
            }
            NameQueryStyle::NativePositional => {
                self.repo.find_by_native_sql(first_name, last_name)?
            }
            NameQueryStyle::NativeNamed => {
                self.repo.find_by_native_sql_named(first_name, last_name)?
            }
        };

        found.ok_or_else(|| {
            warn!(
                "event=employee_lookup module=service status=not_found style={}",
                style.as_str()
            );
            ResourceNotFound::new(format!(
                "employee not found with name: {first_name} {last_name}"
            ))
            .into()
        })
    }

    fn ensure_email_free(&self, employee: &Employee) -> ServiceResult<()> {
        if self
            .repo
            .exists_by_email_excluding(&employee.email, employee.id)?
        {
            warn!(
                "event=employee_save module=service status=rejected reason=email_taken id={}",
                employee.id.unwrap_or_default()
            );
            return Err(ServiceError::EmailTaken(employee.email.clone()));
        }
        Ok(())
    }
}

fn not_found_by_id(id: EmployeeId) -> ResourceNotFound {
    warn!("event=employee_lookup module=service status=not_found id={id}");
    ResourceNotFound::new(format!("employee not found with id: {id}"))
}
