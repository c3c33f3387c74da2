//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the only access path to persisted `employees` rows.
//! - Keep every SQL statement and parameter-binding choice inside this file.
//!
//! # Invariants
//! - Write paths call `Employee::validate()` before SQL mutations.
//! - Read paths report absence as `Ok(None)`, never as an error.
//! - Single-row lookups that match several rows resolve to the lowest `id`.
//! - No employee state is kept between calls; every call hits the store.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError};
use crate::repo::structured_query::{translate, EntityMapping, StructuredQueryError};
use log::debug;
use rusqlite::{named_params, params, Connection, Params, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEES_TABLE: &str = "employees";

/// Entity-to-table mapping used by structured queries.
pub const EMPLOYEE_ENTITY: EntityMapping = EntityMapping {
    entity: "Employee",
    table: EMPLOYEES_TABLE,
    fields: &[
        ("id", "id"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("email", "email"),
    ],
};

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, first_name, last_name, email FROM employees";

const EMAIL_TAKEN_SQL: &str = "SELECT EXISTS(
    SELECT 1 FROM employees WHERE email = ?1 AND (?2 IS NULL OR id != ?2)
);";

const FIND_BY_NAME_STRUCTURED_POSITIONAL: &str =
    "SELECT e FROM Employee e WHERE e.firstName = ?1 AND e.lastName = ?2 ORDER BY e.id ASC";
const FIND_BY_NAME_STRUCTURED_NAMED: &str = "SELECT e FROM Employee e \
     WHERE e.firstName = :firstName AND e.lastName = :lastName ORDER BY e.id ASC";
const FIND_BY_NAME_NATIVE_POSITIONAL: &str = "SELECT id, first_name, last_name, email
FROM employees
WHERE first_name = ?1 AND last_name = ?2
ORDER BY id ASC
LIMIT 1";
const FIND_BY_NAME_NATIVE_NAMED: &str = "SELECT id, first_name, last_name, email
FROM employees
WHERE first_name = :first_name AND last_name = :last_name
ORDER BY id ASC
LIMIT 1";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    InvalidData(String),
    InvalidQuery(StructuredQueryError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::InvalidQuery(err) => write!(f, "invalid structured query: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidQuery(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<StructuredQueryError> for RepoError {
    fn from(value: StructuredQueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

/// Data-access contract for employee records.
///
/// The four `find_by_*` name lookups share one predicate
/// (`first_name = ? AND last_name = ?`) and differ only in how the query text
/// is authored and how parameters are bound.
pub trait EmployeeRepository {
    /// Inserts when `id` is `None`, otherwise writes the row with that id,
    /// creating it when absent. Returns the record as stored.
    fn save(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Returns every stored employee ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    /// Whether any row other than `exclude_id` uses `email`.
    fn exists_by_email_excluding(
        &self,
        email: &str,
        exclude_id: Option<EmployeeId>,
    ) -> RepoResult<bool>;
    /// Removes the row when present; absent ids are a no-op.
    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()>;
    /// Structured query, positional parameters.
    fn find_by_jpql(&self, first_name: &str, last_name: &str) -> RepoResult<Option<Employee>>;
    /// Structured query, named parameters.
    fn find_by_jpql_named_params(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>>;
    /// Native SQL, positional parameters.
    fn find_by_native_sql(&self, first_name: &str, last_name: &str)
        -> RepoResult<Option<Employee>>;
    /// Native SQL, named parameters.
    fn find_by_native_sql_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry every mapped column.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_first<P: Params>(&self, sql: &str, params: P) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_employee_row(row)?)),
            None => Ok(None),
        }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn save(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let Some(id) = employee.id else {
            self.conn.execute(
                "INSERT INTO employees (first_name, last_name, email) VALUES (?1, ?2, ?3);",
                params![employee.first_name, employee.last_name, employee.email],
            )?;
            let id = self.conn.last_insert_rowid();
            debug!("event=employee_save module=repo status=ok op=insert id={id}");
            return Ok(Employee {
                id: Some(id),
                ..employee.clone()
            });
        };

        self.conn.execute(
            "INSERT INTO employees (id, first_name, last_name, email)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email;",
            params![id, employee.first_name, employee.last_name, employee.email],
        )?;
        debug!("event=employee_save module=repo status=ok op=upsert id={id}");

        self.find_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("employee {id} missing right after upsert"))
        })
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.query_first(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"), [id])
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        self.query_first(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE email = ?1 ORDER BY id ASC LIMIT 1;"),
            [email],
        )
    }

    fn exists_by_email_excluding(
        &self,
        email: &str,
        exclude_id: Option<EmployeeId>,
    ) -> RepoResult<bool> {
        let taken = self
            .conn
            .query_row(EMAIL_TAKEN_SQL, params![email, exclude_id], |row| {
                row.get(0)
            })?;
        Ok(taken)
    }

    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        debug!("event=employee_delete module=repo status=ok id={id} removed={changed}");
        Ok(())
    }

    fn find_by_jpql(&self, first_name: &str, last_name: &str) -> RepoResult<Option<Employee>> {
        let sql = translate(FIND_BY_NAME_STRUCTURED_POSITIONAL, &EMPLOYEE_ENTITY)?;
        self.query_first(&sql, params![first_name, last_name])
    }

    fn find_by_jpql_named_params(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>> {
        let sql = translate(FIND_BY_NAME_STRUCTURED_NAMED, &EMPLOYEE_ENTITY)?;
        self.query_first(
            &sql,
            named_params! {
                ":firstName": first_name,
                ":lastName": last_name,
            },
        )
    }

    fn find_by_native_sql(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>> {
        self.query_first(FIND_BY_NAME_NATIVE_POSITIONAL, params![first_name, last_name])
    }

    fn find_by_native_sql_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>> {
        self.query_first(
            FIND_BY_NAME_NATIVE_NAMED,
            named_params! {
                ":first_name": first_name,
                ":last_name": last_name,
            },
        )
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in employees.id"
        )));
    }

    let employee = Employee {
        id: Some(id),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    };
    employee.validate()?;
    Ok(employee)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [EMPLOYEES_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({EMPLOYEES_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<HashSet<_>, _>>()?;

    for (_, column) in EMPLOYEE_ENTITY.fields {
        if !columns.contains(*column) {
            return Err(RepoError::MissingRequiredColumn {
                table: EMPLOYEES_TABLE,
                column: *column,
            });
        }
    }

    Ok(())
}
