//! Remote project table contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the row-store API the board mirrors into (`ProjectTable`).
//! - Keep SQL and JSON column encoding inside the persistence boundary.
//!
//! # Invariants
//! - Reads are scoped by owner and sorted `sort_order ASC, created_at ASC,
//!   id ASC`.
//! - Writes address exactly one row by primary id.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::project::{ProjectId, ProjectValidationError};
use crate::repo::row_mapping::{ProjectRow, RowChanges, OWNER_COLUMN};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    status,
    priority,
    tags,
    due_date,
    progress,
    checklist,
    memo,
    sort_order,
    created_at,
    updated_at
FROM projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for project table operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProjectValidationError),
    Db(DbError),
    NotFound(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
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

/// Row-oriented project table addressed by owner (reads) and id (writes).
pub trait ProjectTable {
    /// Loads every row owned by `user_id`, ascending by ordering column.
    fn select_by_owner(&self, user_id: &str) -> RepoResult<Vec<ProjectRow>>;
    fn insert(&self, row: &ProjectRow) -> RepoResult<()>;
    /// Applies column assignments to one row. `NotFound` when absent.
    fn update(&self, id: ProjectId, changes: &RowChanges) -> RepoResult<()>;
    /// Deletes one row. `NotFound` when absent.
    fn delete(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project table.
///
/// Owns its connection so it can be moved onto the mirror worker thread.
pub struct SqliteProjectRepository {
    conn: Connection,
}

impl SqliteProjectRepository {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Counts rows owned by `user_id`.
    pub fn count_by_owner(&self, user_id: &str) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM projects WHERE {OWNER_COLUMN} = ?1;"),
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn row_exists(&self, id: ProjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ProjectTable for SqliteProjectRepository {
    fn select_by_owner(&self, user_id: &str) -> RepoResult<Vec<ProjectRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE {OWNER_COLUMN} = ?1
             ORDER BY sort_order ASC, created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_project_row(row)?);
        }
        Ok(items)
    }

    fn insert(&self, row: &ProjectRow) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO projects (
                id,
                user_id,
                title,
                description,
                status,
                priority,
                tags,
                due_date,
                progress,
                checklist,
                memo,
                sort_order,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                row.id.to_string(),
                row.user_id.as_str(),
                row.title.as_str(),
                row.description.as_str(),
                row.status.as_str(),
                row.priority.as_str(),
                encode_json(&row.tags)?,
                row.due_date.as_deref(),
                row.progress,
                encode_json(&row.checklist)?,
                row.memo.as_str(),
                row.sort_order,
                row.created_at.as_str(),
                row.updated_at.as_str(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, id: ProjectId, changes: &RowChanges) -> RepoResult<()> {
        if changes.is_empty() {
            return if self.row_exists(id)? {
                Ok(())
            } else {
                Err(RepoError::NotFound(id))
            };
        }

        let mut assignments = Vec::with_capacity(changes.len());
        let mut bind_values = Vec::with_capacity(changes.len() + 1);
        for (index, (column, value)) in changes.iter().enumerate() {
            assignments.push(format!("{column} = ?{}", index + 1));
            bind_values.push(json_to_sql(value));
        }
        bind_values.push(SqlValue::Text(id.to_string()));

        let sql = format!(
            "UPDATE projects SET {} WHERE id = ?{};",
            assignments.join(", "),
            bind_values.len()
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<ProjectRow> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in projects.id"))
    })?;

    let tags_text: String = row.get("tags")?;
    let tags = decode_json(&tags_text, "projects.tags")?;
    let checklist_text: String = row.get("checklist")?;
    let checklist = decode_json(&checklist_text, "projects.checklist")?;

    Ok(ProjectRow {
        id,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        priority: row.get("priority")?,
        tags,
        due_date: row.get("due_date")?,
        progress: row.get("progress")?,
        checklist,
        memo: row.get("memo")?,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode json column: {err}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(text: &str, column: &'static str) -> RepoResult<T> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("invalid json in {column}: {err}")))
}

/// Binds a JSON change value to a SQLite column.
///
/// Arrays and objects are stored as JSON text, matching `tags`/`checklist`.
fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => SqlValue::Integer(integer),
            None => SqlValue::Real(number.as_f64().unwrap_or_default()),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::json_to_sql;
    use rusqlite::types::Value as SqlValue;
    use serde_json::json;

    #[test]
    fn json_values_bind_to_sqlite_types() {
        assert_eq!(json_to_sql(&json!(null)), SqlValue::Null);
        assert_eq!(json_to_sql(&json!(true)), SqlValue::Integer(1));
        assert_eq!(json_to_sql(&json!(42)), SqlValue::Integer(42));
        assert_eq!(json_to_sql(&json!("idea")), SqlValue::Text("idea".to_string()));
        assert_eq!(
            json_to_sql(&json!(["web", "rust"])),
            SqlValue::Text(r#"["web","rust"]"#.to_string())
        );
    }
}
