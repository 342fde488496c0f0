//! Project (card) domain model.
//!
//! # Responsibility
//! - Define the canonical project record, its creation input and its
//!   field-level partial update.
//! - Provide validation used by persistence read paths.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `progress` stays within `0..=100`.
//! - A non-empty checklist supersedes the manual `progress` value.
//! - Title emptiness is an entry-form concern and is not validated here.

use crate::model::checklist::{calculate_progress, ChecklistItem};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every project card.
pub type ProjectId = Uuid;

/// Upper bound of manual progress.
pub const MAX_PROGRESS: u8 = 100;

/// Caps manual progress at `MAX_PROGRESS`.
pub fn clamp_progress(progress: u8) -> u8 {
    progress.min(MAX_PROGRESS)
}

/// Board column a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnStatus {
    /// Not started yet.
    Idea,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl ColumnStatus {
    /// All columns in board display order.
    pub const ALL: [ColumnStatus; 3] = [Self::Idea, Self::InProgress, Self::Done];

    /// Wire form shared by serde and the remote table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idea" => Some(Self::Idea),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Human-readable column heading.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idea => "Idea",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Position of the column in `ColumnStatus::ALL`.
    pub fn index(self) -> usize {
        match self {
            Self::Idea => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }
}

/// Project urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation errors for persisted project state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// Manual progress outside `0..=100`.
    ProgressOutOfRange(u8),
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress must be within 0..=100, got {value}")
            }
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must not precede created_at ({created_at})"
            ),
        }
    }
}

impl Error for ProjectValidationError {}

/// Canonical project card record.
///
/// Serialized with camelCase field names (`dueDate`, `createdAt`, ...), the
/// naming used by local snapshots. The remote table uses its own column
/// names, see `repo::row_mapping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: ColumnStatus,
    pub priority: Priority,
    /// Display-insertion order; duplicates are tolerated.
    pub tags: Vec<String>,
    /// Calendar date without time component.
    pub due_date: Option<NaiveDate>,
    /// Manual progress, only shown while the checklist is empty.
    pub progress: u8,
    pub checklist: Vec<ChecklistItem>,
    pub memo: String,
    /// Intra-column sequence. Collisions are tolerated.
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Materializes a creation request with store-assigned identity fields.
    pub fn from_new(data: NewProject, id: ProjectId, order: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            tags: data.tags,
            due_date: data.due_date,
            progress: clamp_progress(data.progress),
            checklist: data.checklist,
            memo: data.memo,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Progress shown to the user.
    ///
    /// Checklist-derived when the checklist is non-empty, manual otherwise.
    pub fn effective_progress(&self) -> u8 {
        if self.checklist.is_empty() {
            self.progress
        } else {
            calculate_progress(&self.checklist)
        }
    }

    /// Refreshes `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Validates invariants that persisted state must satisfy.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.progress > MAX_PROGRESS {
            return Err(ProjectValidationError::ProgressOutOfRange(self.progress));
        }
        if self.updated_at < self.created_at {
            return Err(ProjectValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Creation input: a project without id, order and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub status: ColumnStatus,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub progress: u8,
    pub checklist: Vec<ChecklistItem>,
    pub memo: String,
}

impl NewProject {
    /// Creates a request with entry-form defaults (`medium`, no tags, no date).
    pub fn new(title: impl Into<String>, status: ColumnStatus) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status,
            priority: Priority::default(),
            tags: Vec::new(),
            due_date: None,
            progress: 0,
            checklist: Vec::new(),
            memo: String::new(),
        }
    }
}

/// Field-level partial update.
///
/// `Some` replaces the whole field (supplying `tags` replaces the list);
/// `None` leaves it untouched. `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ColumnStatus>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub progress: Option<u8>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub memo: Option<String>,
    pub order: Option<i64>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replaces every supplied field on `project`. Does not touch timestamps.
    ///
    /// Out-of-range progress is capped at `MAX_PROGRESS`.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(tags) = &self.tags {
            project.tags = tags.clone();
        }
        if let Some(due_date) = self.due_date {
            project.due_date = due_date;
        }
        if let Some(progress) = self.progress {
            project.progress = clamp_progress(progress);
        }
        if let Some(checklist) = &self.checklist {
            project.checklist = checklist.clone();
        }
        if let Some(memo) = &self.memo {
            project.memo = memo.clone();
        }
        if let Some(order) = self.order {
            project.order = order;
        }
    }
}

/// Splits comma-separated tag input the way the entry form does.
///
/// Entries are trimmed, empty entries dropped, order kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
