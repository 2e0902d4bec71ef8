//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `deptree_core` linkage with deterministic output.
//! - Print the local mirror hierarchy when given a database path.
//! - Write rolling logs when `DEPTREE_LOG_DIR` is set.

use deptree_core::db::open_db;
use deptree_core::{
    hierarchy_rows, init_logging, max_depth, ExpansionState, LocalDepartmentStore, LoggingConfig,
    SqliteDepartmentRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(message) = start_logging() {
        eprintln!("error: {message}");
        return ExitCode::FAILURE;
    }

    println!("deptree_core ping={}", deptree_core::ping());
    println!("deptree_core version={}", deptree_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_hierarchy(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging() -> Result<(), String> {
    match LoggingConfig::from_env().map_err(|err| err.to_string())? {
        Some(config) => init_logging(config).map_err(|err| err.to_string()),
        None => Ok(()),
    }
}

fn print_hierarchy(db_path: &str) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let repo = SqliteDepartmentRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let store = LocalDepartmentStore::open(repo).map_err(|err| err.to_string())?;

    let departments = store.departments();
    println!(
        "departments={} max_depth={}",
        departments.len(),
        max_depth(departments)
    );
    for row in hierarchy_rows(departments, &ExpansionState::new()) {
        let marker = if row.is_root() { " (root)" } else { "" };
        println!("{}{}{}", "  ".repeat(row.level), row.name, marker);
    }
    Ok(())
}
