//! Translation between project records and remote table rows.
//!
//! # Responsibility
//! - Own the bidirectional field/column naming table.
//! - Convert records, creation rows and partial updates into the remote
//!   row shape and back.
//!
//! # Invariants
//! - Every `ProjectField` has exactly one record name and one column name.
//! - Timestamps cross the boundary as RFC 3339 UTC strings with millisecond
//!   precision; due dates as `YYYY-MM-DD`.
//! - `row_to_project` rejects rows that fail `Project::validate()`.

use crate::model::checklist::ChecklistItem;
use crate::model::project::{
    clamp_progress, ColumnStatus, Priority, Project, ProjectId, ProjectPatch,
};
use crate::repo::project_repo::{RepoError, RepoResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Remote column holding the owning user id.
pub const OWNER_COLUMN: &str = "user_id";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted project field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Id,
    Title,
    Description,
    Status,
    Priority,
    Tags,
    DueDate,
    Progress,
    Checklist,
    Memo,
    Order,
    CreatedAt,
    UpdatedAt,
}

/// `(field, record name, column name)`.
const FIELD_NAMES: &[(ProjectField, &str, &str)] = &[
    (ProjectField::Id, "id", "id"),
    (ProjectField::Title, "title", "title"),
    (ProjectField::Description, "description", "description"),
    (ProjectField::Status, "status", "status"),
    (ProjectField::Priority, "priority", "priority"),
    (ProjectField::Tags, "tags", "tags"),
    (ProjectField::DueDate, "dueDate", "due_date"),
    (ProjectField::Progress, "progress", "progress"),
    (ProjectField::Checklist, "checklist", "checklist"),
    (ProjectField::Memo, "memo", "memo"),
    (ProjectField::Order, "order", "sort_order"),
    (ProjectField::CreatedAt, "createdAt", "created_at"),
    (ProjectField::UpdatedAt, "updatedAt", "updated_at"),
];

impl ProjectField {
    /// Every field, in table order.
    pub fn all() -> impl Iterator<Item = ProjectField> {
        FIELD_NAMES.iter().map(|(field, _, _)| *field)
    }

    /// In-memory record name (camelCase).
    pub fn field_name(self) -> &'static str {
        self.entry().1
    }

    /// Remote column name (snake_case).
    pub fn column_name(self) -> &'static str {
        self.entry().2
    }

    // `FIELD_NAMES` lists variants in declaration order.
    fn entry(self) -> &'static (ProjectField, &'static str, &'static str) {
        &FIELD_NAMES[self as usize]
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        FIELD_NAMES
            .iter()
            .find(|(_, field_name, _)| *field_name == name)
            .map(|(field, _, _)| *field)
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        FIELD_NAMES
            .iter()
            .find(|(_, _, column_name)| *column_name == name)
            .map(|(field, _, _)| *field)
    }
}

/// Maps a record field name to its remote column name.
pub fn column_for_field(field_name: &str) -> Option<&'static str> {
    ProjectField::from_field_name(field_name).map(ProjectField::column_name)
}

/// Maps a remote column name to its record field name.
pub fn field_for_column(column_name: &str) -> Option<&'static str> {
    ProjectField::from_column_name(column_name).map(ProjectField::field_name)
}

/// One project row in the remote table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: ProjectId,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub due_date: Option<String>,
    pub progress: i64,
    pub checklist: Vec<ChecklistItem>,
    pub memo: String,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Ordered column assignments for one remote update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowChanges {
    entries: Vec<(ProjectField, Value)>,
}

impl RowChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field, replacing an earlier assignment of the same field.
    pub fn set(&mut self, field: ProjectField, value: Value) {
        match self.entries.iter_mut().find(|(current, _)| *current == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn with(mut self, field: ProjectField, value: Value) -> Self {
        self.set(field, value);
        self
    }

    /// Value assigned to a remote column, if any.
    pub fn get(&self, column_name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(field, _)| field.column_name() == column_name)
            .map(|(_, value)| value)
    }

    /// Iterates `(column name, value)` in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.column_name(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Formats a timestamp the way it is stored remotely.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds the insert row for `project` owned by `user_id`.
pub fn project_to_row(project: &Project, user_id: &str) -> ProjectRow {
    ProjectRow {
        id: project.id,
        user_id: user_id.to_string(),
        title: project.title.clone(),
        description: project.description.clone(),
        status: project.status.as_str().to_string(),
        priority: project.priority.as_str().to_string(),
        tags: project.tags.clone(),
        due_date: project.due_date.map(format_due_date),
        progress: i64::from(project.progress),
        checklist: project.checklist.clone(),
        memo: project.memo.clone(),
        sort_order: project.order,
        created_at: format_timestamp(project.created_at),
        updated_at: format_timestamp(project.updated_at),
    }
}

/// Converts a remote row back into a validated project record.
pub fn row_to_project(row: ProjectRow) -> RepoResult<Project> {
    let status = ColumnStatus::parse(&row.status).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{}` in projects.status", row.status))
    })?;
    let priority = Priority::parse(&row.priority).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{}` in projects.priority",
            row.priority
        ))
    })?;
    let due_date = row
        .due_date
        .as_deref()
        .map(|value| {
            NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).map_err(|_| {
                RepoError::InvalidData(format!("invalid date `{value}` in projects.due_date"))
            })
        })
        .transpose()?;
    let progress = u8::try_from(row.progress).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid progress `{}` in projects.progress",
            row.progress
        ))
    })?;

    let project = Project {
        id: row.id,
        title: row.title,
        description: row.description,
        status,
        priority,
        tags: row.tags,
        due_date,
        progress,
        checklist: row.checklist,
        memo: row.memo,
        order: row.sort_order,
        created_at: parse_timestamp(&row.created_at, "projects.created_at")?,
        updated_at: parse_timestamp(&row.updated_at, "projects.updated_at")?,
    };
    project.validate()?;
    Ok(project)
}

/// Translates a partial update into remote column assignments.
///
/// Only supplied fields are emitted, followed by `updated_at`.
pub fn patch_to_changes(patch: &ProjectPatch, updated_at: DateTime<Utc>) -> RowChanges {
    let mut changes = RowChanges::new();
    if let Some(title) = &patch.title {
        changes.set(ProjectField::Title, Value::from(title.as_str()));
    }
    if let Some(description) = &patch.description {
        changes.set(ProjectField::Description, Value::from(description.as_str()));
    }
    if let Some(status) = patch.status {
        changes.set(ProjectField::Status, Value::from(status.as_str()));
    }
    if let Some(priority) = patch.priority {
        changes.set(ProjectField::Priority, Value::from(priority.as_str()));
    }
    if let Some(tags) = &patch.tags {
        changes.set(ProjectField::Tags, Value::from(tags.clone()));
    }
    if let Some(due_date) = patch.due_date {
        changes.set(ProjectField::DueDate, due_date_value(due_date));
    }
    if let Some(progress) = patch.progress {
        changes.set(ProjectField::Progress, Value::from(clamp_progress(progress)));
    }
    if let Some(checklist) = &patch.checklist {
        changes.set(ProjectField::Checklist, checklist_value(checklist));
    }
    if let Some(memo) = &patch.memo {
        changes.set(ProjectField::Memo, Value::from(memo.as_str()));
    }
    if let Some(order) = patch.order {
        changes.set(ProjectField::Order, Value::from(order));
    }
    changes.set(ProjectField::UpdatedAt, timestamp_value(updated_at));
    changes
}

pub fn timestamp_value(value: DateTime<Utc>) -> Value {
    Value::from(format_timestamp(value))
}

pub fn due_date_value(value: Option<NaiveDate>) -> Value {
    match value {
        Some(date) => Value::from(format_due_date(date)),
        None => Value::Null,
    }
}

/// Checklist as stored remotely: an array of `{id, text, checked}`.
pub fn checklist_value(checklist: &[ChecklistItem]) -> Value {
    Value::Array(
        checklist
            .iter()
            .map(|item| {
                json!({
                    "id": item.id.to_string(),
                    "text": item.text,
                    "checked": item.checked,
                })
            })
            .collect(),
    )
}

fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

fn parse_timestamp(value: &str, column: &'static str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}

#[cfg(test)]
mod tests {
    use super::{
        column_for_field, field_for_column, patch_to_changes, project_to_row, row_to_project,
        ProjectField, FIELD_NAMES,
    };
    use crate::model::project::{ColumnStatus, NewProject, Project, ProjectPatch};
    use crate::repo::project_repo::RepoError;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::Value;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn mapping_covers_every_field() {
        for (index, (field, _, _)) in FIELD_NAMES.iter().enumerate() {
            assert_eq!(*field as usize, index);
        }
        let fields = ProjectField::all().collect::<HashSet<_>>();
        assert_eq!(fields.len(), FIELD_NAMES.len());
        for field in fields {
            assert_eq!(ProjectField::from_field_name(field.field_name()), Some(field));
            assert_eq!(ProjectField::from_column_name(field.column_name()), Some(field));
        }
    }

    #[test]
    fn renamed_fields_translate_both_ways() {
        for (field, column) in [
            ("dueDate", "due_date"),
            ("createdAt", "created_at"),
            ("updatedAt", "updated_at"),
            ("order", "sort_order"),
        ] {
            assert_eq!(column_for_field(field), Some(column));
            assert_eq!(field_for_column(column), Some(field));
        }
        assert_eq!(column_for_field("title"), Some("title"));
        assert_eq!(column_for_field("user_id"), None);
        assert_eq!(field_for_column("order"), None);
    }

    #[test]
    fn row_roundtrip_preserves_record() {
        let created = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let mut data = NewProject::new("Roundtrip", ColumnStatus::Done);
        data.due_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        data.tags = vec!["web".to_string()];
        let project = Project::from_new(data, Uuid::new_v4(), 4, created);

        let row = project_to_row(&project, "user-1");
        assert_eq!(row.status, "done");
        assert_eq!(row.due_date.as_deref(), Some("2026-02-01"));
        assert_eq!(row.created_at, "2026-01-02T03:04:05.000Z");
        assert_eq!(row.sort_order, 4);

        let restored = row_to_project(row).unwrap();
        assert_eq!(restored, project);
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let project = Project::from_new(
            NewProject::new("Bad", ColumnStatus::Idea),
            Uuid::new_v4(),
            0,
            Utc::now(),
        );
        let mut row = project_to_row(&project, "user-1");
        row.status = "archived".to_string();
        assert!(matches!(row_to_project(row), Err(RepoError::InvalidData(_))));
    }

    #[test]
    fn patch_emits_only_supplied_columns_plus_updated_at() {
        let now = Utc.with_ymd_and_hms(2026, 5, 6, 7, 8, 9).unwrap();
        let patch = ProjectPatch {
            due_date: Some(None),
            order: Some(3),
            ..ProjectPatch::default()
        };
        let changes = patch_to_changes(&patch, now);

        let columns = changes.iter().map(|(column, _)| column).collect::<Vec<_>>();
        assert_eq!(columns, vec!["due_date", "sort_order", "updated_at"]);
        assert_eq!(changes.get("due_date"), Some(&Value::Null));
        assert_eq!(changes.get("sort_order"), Some(&Value::from(3)));
        assert_eq!(
            changes.get("updated_at"),
            Some(&Value::from("2026-05-06T07:08:09.000Z"))
        );
    }

    #[test]
    fn patch_progress_is_capped_before_reaching_the_table() {
        let patch = ProjectPatch {
            progress: Some(150),
            ..ProjectPatch::default()
        };
        let changes = patch_to_changes(&patch, Utc::now());
        assert_eq!(changes.get("progress"), Some(&Value::from(100)));
    }
}
