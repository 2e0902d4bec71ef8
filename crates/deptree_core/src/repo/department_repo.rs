//! Department repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the local department mirror, including sub-department labels.
//! - Keep SQL details and ordering behavior inside the repository boundary.
//!
//! # Invariants
//! - Listing is deterministic: insertion order (`position ASC`).
//! - Deleting a department promotes its direct children to root level in
//!   the same transaction.
//! - Sub-department rows are always replaced as a whole.
//! - Ids are stored as JSON text, so `42` and `"42"` stay distinct ids.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::department::{Department, DepartmentId, NewDepartment, SubDepartment};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by department repository operations.
pub type DepartmentRepoResult<T> = Result<T, DepartmentRepoError>;

/// Errors from department repository operations.
#[derive(Debug)]
pub enum DepartmentRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target department does not exist.
    NotFound(DepartmentId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for DepartmentRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "department not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "department repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "department repository requires table `{table}`")
            }
        }
    }
}

impl Error for DepartmentRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for DepartmentRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for DepartmentRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the local department mirror.
pub trait DepartmentRepository {
    /// Persists a new department under a freshly generated local id.
    ///
    /// `input` is expected to be normalized already.
    fn create(&self, input: &NewDepartment) -> DepartmentRepoResult<Department>;
    /// Loads one department by id.
    fn get(&self, id: &DepartmentId) -> DepartmentRepoResult<Option<Department>>;
    /// Lists all departments in insertion order.
    fn list(&self) -> DepartmentRepoResult<Vec<Department>>;
    /// Overwrites name, parent and sub-departments of an existing record.
    fn update(&self, department: &Department) -> DepartmentRepoResult<()>;
    /// Deletes one department and clears `parent_id` on its direct children.
    ///
    /// Returns promoted child ids in insertion order.
    fn delete_promoting_children(
        &self,
        id: &DepartmentId,
    ) -> DepartmentRepoResult<Vec<DepartmentId>>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> DepartmentRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create(&self, input: &NewDepartment) -> DepartmentRepoResult<Department> {
        let department = Department {
            id: DepartmentId::generate(),
            name: input.name.clone(),
            parent_id: input.parent_id.clone(),
            sub_departments: input.sub_departments.clone(),
        };

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM departments;",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO departments (id, name, parent_id, position)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                department.id,
                department.name,
                department.parent_id,
                position,
            ],
        )?;
        write_sub_departments(&tx, &department.id, &department.sub_departments)?;
        tx.commit()?;

        Ok(department)
    }

    fn get(&self, id: &DepartmentId) -> DepartmentRepoResult<Option<Department>> {
        let department = self
            .conn
            .query_row(
                "SELECT id, name, parent_id
                 FROM departments
                 WHERE id = ?1;",
                [id],
                parse_department_row,
            )
            .optional()?;

        match department {
            Some(mut department) => {
                department.sub_departments = load_sub_departments(self.conn, &department.id)?;
                Ok(Some(department))
            }
            None => Ok(None),
        }
    }

    fn list(&self) -> DepartmentRepoResult<Vec<Department>> {
        let mut subs_by_department = load_all_sub_departments(self.conn)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, name, parent_id
             FROM departments
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let mut department = parse_department_row(row)?;
            department.sub_departments = subs_by_department
                .remove(&department.id)
                .unwrap_or_default();
            items.push(department);
        }
        Ok(items)
    }

    fn update(&self, department: &Department) -> DepartmentRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE departments
             SET name = ?2,
                 parent_id = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                department.id,
                department.name,
                department.parent_id,
            ],
        )?;
        if changed == 0 {
            return Err(DepartmentRepoError::NotFound(department.id.clone()));
        }

        tx.execute(
            "DELETE FROM sub_departments WHERE department_id = ?1;",
            [&department.id],
        )?;
        write_sub_departments(&tx, &department.id, &department.sub_departments)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_promoting_children(
        &self,
        id: &DepartmentId,
    ) -> DepartmentRepoResult<Vec<DepartmentId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let deleted = tx.execute("DELETE FROM departments WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(DepartmentRepoError::NotFound(id.clone()));
        }

        let promoted = {
            let mut stmt = tx.prepare(
                "SELECT id
                 FROM departments
                 WHERE parent_id = ?1
                 ORDER BY position ASC;",
            )?;
            let mut rows = stmt.query([id])?;
            let mut ids = Vec::new();
            while let Some(row) = rows.next()? {
                ids.push(row.get::<_, DepartmentId>(0)?);
            }
            ids
        };

        tx.execute(
            "UPDATE departments
             SET parent_id = NULL,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE parent_id = ?1;",
            [id],
        )?;

        tx.commit()?;
        Ok(promoted)
    }
}

impl ToSql for DepartmentId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = serde_json::to_string(self)
            .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
        Ok(ToSqlOutput::from(text))
    }
}

impl FromSql for DepartmentId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        serde_json::from_str(value.as_str()?).map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

fn write_sub_departments(
    conn: &Connection,
    department_id: &DepartmentId,
    sub_departments: &[SubDepartment],
) -> DepartmentRepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO sub_departments (department_id, position, name)
         VALUES (?1, ?2, ?3);",
    )?;
    for (index, sub) in sub_departments.iter().enumerate() {
        stmt.execute(params![department_id, index as i64, sub.name])?;
    }
    Ok(())
}

fn load_sub_departments(
    conn: &Connection,
    department_id: &DepartmentId,
) -> DepartmentRepoResult<Vec<SubDepartment>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM sub_departments
         WHERE department_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([department_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(SubDepartment::new(row.get::<_, String>(0)?));
    }
    Ok(items)
}

fn load_all_sub_departments(
    conn: &Connection,
) -> DepartmentRepoResult<HashMap<DepartmentId, Vec<SubDepartment>>> {
    let mut stmt = conn.prepare(
        "SELECT department_id, name
         FROM sub_departments
         ORDER BY department_id ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut grouped: HashMap<DepartmentId, Vec<SubDepartment>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let department_id: DepartmentId = row.get(0)?;
        let name: String = row.get(1)?;
        grouped
            .entry(department_id)
            .or_default()
            .push(SubDepartment::new(name));
    }
    Ok(grouped)
}

fn parse_department_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
        sub_departments: Vec::new(),
    })
}

fn ensure_connection_ready(conn: &Connection) -> DepartmentRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(DepartmentRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["departments", "sub_departments"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(DepartmentRepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
