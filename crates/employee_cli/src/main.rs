//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `employee_core` linkage and the configured store end to end.
//! - Print deterministic `key=value` lines for quick local sanity checks.
//!
//! # Invariants
//! - Sample rows left behind by an interrupted run are removed before the
//!   next run saves its own.

use employee_core::{
    CoreConfig, Employee, EmployeeRepository, EmployeeService, NameQueryStyle, RepoResult,
    SqliteEmployeeRepository,
};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::process::ExitCode;

const SAMPLE_FIRST_NAME: &str = "smoke_first_name";
const SAMPLE_LAST_NAME: &str = "smoke_last_name";
const SAMPLE_EMAIL: &str = "smoke@example.invalid";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_smoke module=cli status=error error={err}");
            eprintln!("employee_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    let logging = config.init_logging()?;
    println!("employee_core version={}", employee_core::core_version());
    println!("employee_core file_logging={logging}");

    let conn = config.open_store()?;
    for line in run_smoke(&conn)? {
        println!("employee_core {line}");
    }
    Ok(())
}

/// Saves a sample employee, looks it up every way, then deletes it.
fn run_smoke(conn: &Connection) -> Result<Vec<String>, Box<dyn Error>> {
    let repo = SqliteEmployeeRepository::try_new(conn)?;
    let stale = clear_sample_rows(&repo)?;
    if stale > 0 {
        info!("event=cli_smoke module=cli status=cleanup removed={stale}");
    }

    let service = EmployeeService::new(repo);
    let mut report = vec![format!("stale_removed={stale}")];

    let saved = service.save_employee(&Employee::new(
        SAMPLE_FIRST_NAME,
        SAMPLE_LAST_NAME,
        SAMPLE_EMAIL,
    ))?;
    let id = saved.id.ok_or("saved employee has no id")?;
    report.push(format!("saved_id={id}"));

    for style in NameQueryStyle::ALL {
        let found = service.find_by_name(SAMPLE_FIRST_NAME, SAMPLE_LAST_NAME, style)?;
        report.push(format!(
            "lookup={} id={}",
            style.as_str(),
            found.id.unwrap_or_default()
        ));
    }

    service.delete_employee(id)?;
    report.push(format!("remaining={}", service.get_all_employees()?.len()));
    Ok(report)
}

fn clear_sample_rows(repo: &impl EmployeeRepository) -> RepoResult<usize> {
    let mut removed = 0;
    while let Some(stale) = repo.find_by_email(SAMPLE_EMAIL)? {
        let Some(id) = stale.id else {
            break;
        };
        repo.delete_by_id(id)?;
        removed += 1;
    }
    Ok(removed)
}
