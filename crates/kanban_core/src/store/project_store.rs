//! Authoritative in-memory project collection.
//!
//! # Responsibility
//! - Own the project list and filter state; expose every mutation.
//! - Apply mutations locally first, then enqueue the matching remote write
//!   when a mirror is attached.
//!
//! # Invariants
//! - Local mutations never fail; unknown ids are silent no-ops.
//! - Every applied mutation refreshes `updated_at`.
//! - New projects land last in their column (`max order + 1`, or `0`).
//! - With a mirror attached but no user id, `add_project` and
//!   `update_project` do nothing.

use crate::board::drag::DropAction;
use crate::board::filter::{FilterPatch, FilterState};
use crate::board::view::{all_tags, BoardView};
use crate::model::checklist::{ChecklistItem, ChecklistItemId};
use crate::model::project::{ColumnStatus, NewProject, Project, ProjectId, ProjectPatch};
use crate::repo::project_repo::{ProjectTable, RepoResult};
use crate::repo::row_mapping::{
    checklist_value, patch_to_changes, project_to_row, row_to_project, timestamp_value,
    ProjectField, ProjectRow, RowChanges,
};
use crate::snapshot::BoardSnapshot;
use crate::sync::mirror::{MirrorSender, RemoteWrite};
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;
use uuid::Uuid;

/// Explicitly constructed board state container.
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
    filter: FilterState,
    loading: bool,
    user_id: Option<String>,
    mirror: Option<MirrorSender>,
}

impl ProjectStore {
    /// Creates an empty local-only store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store mirroring mutations through `mirror`.
    pub fn with_mirror(mirror: MirrorSender) -> Self {
        Self {
            mirror: Some(mirror),
            ..Self::default()
        }
    }

    /// Creates a local-only store restored from a snapshot.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut store = Self::new();
        store.load_snapshot(snapshot);
        store
    }

    /// Replaces projects and filter state with `snapshot`.
    pub fn load_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.projects = snapshot.projects;
        self.filter = snapshot.filter;
    }

    /// Captures projects and filter state for the local persisted variant.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            projects: self.projects.clone(),
            filter: self.filter.clone(),
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether a fetch started by `begin_fetch` is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// All projects in collection order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Visible projects grouped by column under the current filter.
    pub fn board(&self) -> BoardView<'_> {
        BoardView::build(&self.projects, &self.filter)
    }

    /// Sorted tag vocabulary across every project, ignoring filters.
    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.projects)
    }

    /// Marks the store as loading and returns the owner to fetch for.
    ///
    /// Returns `None` (and stays idle) when no user id is set.
    pub fn begin_fetch(&mut self) -> Option<String> {
        let user_id = self.user_id.clone()?;
        self.loading = true;
        Some(user_id)
    }

    /// Completes a fetch started by `begin_fetch`.
    ///
    /// On success the collection is replaced by the fetched rows and their
    /// count is returned. On failure the collection is left untouched.
    pub fn finish_fetch(&mut self, rows: RepoResult<Vec<ProjectRow>>) -> RepoResult<usize> {
        self.loading = false;
        let projects = rows?
            .into_iter()
            .map(row_to_project)
            .collect::<RepoResult<Vec<_>>>()?;
        let count = projects.len();
        self.projects = projects;
        info!("event=projects_fetch module=store status=ok count={count}");
        Ok(count)
    }

    /// Loads every project owned by the current user from `source`.
    ///
    /// No-op returning `Ok(0)` when no user id is set.
    pub fn fetch_projects(&mut self, source: &dyn ProjectTable) -> RepoResult<usize> {
        let Some(user_id) = self.begin_fetch() else {
            debug!("event=projects_fetch module=store status=skipped reason=no_user");
            return Ok(0);
        };
        let rows = source.select_by_owner(&user_id);
        let result = self.finish_fetch(rows);
        if let Err(err) = &result {
            warn!("event=projects_fetch module=store status=error error={err}");
        }
        result
    }

    /// Appends a new project at the end of its column.
    ///
    /// Returns the generated id, or `None` when the store is mirrored and no
    /// user id is set.
    pub fn add_project(&mut self, data: NewProject) -> Option<ProjectId> {
        if self.requires_user() {
            debug!("event=project_add module=store status=skipped reason=no_user");
            return None;
        }

        let order = next_order(&self.projects, data.status);
        let project = Project::from_new(data, Uuid::new_v4(), order, Utc::now());
        let id = project.id;

        if let (Some(mirror), Some(user_id)) = (&self.mirror, &self.user_id) {
            mirror.send(RemoteWrite::Insert(project_to_row(&project, user_id)));
        }
        self.projects.push(project);
        debug!("event=project_add module=store status=ok project_id={id} order={order}");
        Some(id)
    }

    /// Replaces the supplied fields of one project.
    pub fn update_project(&mut self, id: ProjectId, patch: ProjectPatch) -> bool {
        if self.requires_user() {
            debug!("event=project_update module=store status=skipped reason=no_user");
            return false;
        }

        let Some(project) = self.modify(id, |project| patch.apply_to(project)) else {
            return false;
        };
        let changes = patch_to_changes(&patch, project.updated_at);
        self.mirror_write(RemoteWrite::Update { id, changes });
        true
    }

    /// Removes one project together with its checklist.
    pub fn delete_project(&mut self, id: ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|project| project.id != id);
        if self.projects.len() == before {
            return false;
        }
        self.mirror_write(RemoteWrite::Delete(id));
        debug!("event=project_delete module=store status=ok project_id={id}");
        true
    }

    /// Sets column and order together.
    ///
    /// Callers compute `new_order`; drag-and-drop appends (see
    /// `board::drag::resolve_drop`).
    pub fn move_project(&mut self, id: ProjectId, new_status: ColumnStatus, new_order: i64) -> bool {
        let Some(project) = self.modify(id, |project| {
            project.status = new_status;
            project.order = new_order;
        }) else {
            return false;
        };
        let changes = RowChanges::new()
            .with(ProjectField::Status, Value::from(new_status.as_str()))
            .with(ProjectField::Order, Value::from(new_order))
            .with(ProjectField::UpdatedAt, timestamp_value(project.updated_at));
        self.mirror_write(RemoteWrite::Update { id, changes });
        true
    }

    /// Sets the intra-column order only.
    ///
    /// Drag-and-drop passes the displaced project's order, so both end up
    /// sharing one value; the column is not renumbered.
    pub fn reorder_project(&mut self, id: ProjectId, new_order: i64) -> bool {
        let Some(project) = self.modify(id, |project| project.order = new_order) else {
            return false;
        };
        let changes = RowChanges::new()
            .with(ProjectField::Order, Value::from(new_order))
            .with(ProjectField::UpdatedAt, timestamp_value(project.updated_at));
        self.mirror_write(RemoteWrite::Update { id, changes });
        true
    }

    /// Applies a resolved drag-and-drop action.
    pub fn apply_drop(&mut self, action: DropAction) -> bool {
        match action {
            DropAction::Move { id, status, order } => self.move_project(id, status, order),
            DropAction::Reorder { id, order } => self.reorder_project(id, order),
        }
    }

    /// Rewrites one column's orders to `0..n` in current display order.
    ///
    /// Only projects whose order actually changes are touched and mirrored.
    /// Returns the number of projects renumbered.
    pub fn renumber_column(&mut self, status: ColumnStatus) -> usize {
        let mut indices = self
            .projects
            .iter()
            .enumerate()
            .filter(|(_, project)| project.status == status)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        indices.sort_by_key(|index| self.projects[*index].order);

        let now = Utc::now();
        let mut writes = Vec::new();
        for (rank, index) in indices.into_iter().enumerate() {
            let project = &mut self.projects[index];
            let rank = rank as i64;
            if project.order == rank {
                continue;
            }
            project.order = rank;
            project.touch(now);
            let changes = RowChanges::new()
                .with(ProjectField::Order, Value::from(rank))
                .with(ProjectField::UpdatedAt, timestamp_value(project.updated_at));
            writes.push(RemoteWrite::Update {
                id: project.id,
                changes,
            });
        }

        let renumbered = writes.len();
        for write in writes {
            self.mirror_write(write);
        }
        debug!(
            "event=column_renumber module=store status=ok column={} renumbered={renumbered}",
            status.as_str()
        );
        renumbered
    }

    /// Flips `checked` on one checklist item.
    pub fn toggle_checklist_item(&mut self, project_id: ProjectId, item_id: ChecklistItemId) -> bool {
        self.edit_checklist(project_id, |checklist| {
            for item in checklist.iter_mut().filter(|item| item.id == item_id) {
                item.checked = !item.checked;
            }
        })
    }

    /// Appends an unchecked item; returns its id when the project exists.
    pub fn add_checklist_item(
        &mut self,
        project_id: ProjectId,
        text: impl Into<String>,
    ) -> Option<ChecklistItemId> {
        let item = ChecklistItem::new(text);
        let item_id = item.id;
        self.edit_checklist(project_id, move |checklist| checklist.push(item))
            .then_some(item_id)
    }

    /// Removes one checklist item.
    pub fn remove_checklist_item(&mut self, project_id: ProjectId, item_id: ChecklistItemId) -> bool {
        self.edit_checklist(project_id, |checklist| {
            checklist.retain(|item| item.id != item_id)
        })
    }

    /// Merges filter fields. Pure state setter.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filter.apply(patch);
    }

    /// Resets search, tag and priority filters.
    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
    }

    fn requires_user(&self) -> bool {
        self.mirror.is_some() && self.user_id.is_none()
    }

    /// Applies `change` to one project and refreshes its `updated_at`.
    fn modify(&mut self, id: ProjectId, change: impl FnOnce(&mut Project)) -> Option<&Project> {
        let project = self.projects.iter_mut().find(|project| project.id == id)?;
        change(project);
        project.touch(Utc::now());
        Some(project)
    }

    /// Rewrites a checklist (even when the item id matched nothing) and
    /// mirrors the resulting list.
    fn edit_checklist(
        &mut self,
        project_id: ProjectId,
        change: impl FnOnce(&mut Vec<ChecklistItem>),
    ) -> bool {
        let Some(project) = self.modify(project_id, |project| change(&mut project.checklist))
        else {
            return false;
        };
        let changes = RowChanges::new()
            .with(ProjectField::Checklist, checklist_value(&project.checklist))
            .with(ProjectField::UpdatedAt, timestamp_value(project.updated_at));
        self.mirror_write(RemoteWrite::Update {
            id: project_id,
            changes,
        });
        true
    }

    fn mirror_write(&self, write: RemoteWrite) {
        if let Some(mirror) = &self.mirror {
            mirror.send(write);
        }
    }
}

/// Order placing a new project last in `status`.
fn next_order(projects: &[Project], status: ColumnStatus) -> i64 {
    projects
        .iter()
        .filter(|project| project.status == status)
        .map(|project| project.order)
        .max()
        .map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::next_order;
    use crate::model::project::{ColumnStatus, NewProject, Project};
    use chrono::Utc;
    use uuid::Uuid;

    fn at(status: ColumnStatus, order: i64) -> Project {
        Project::from_new(NewProject::new("p", status), Uuid::new_v4(), order, Utc::now())
    }

    #[test]
    fn next_order_starts_at_zero_for_empty_column() {
        let projects = vec![at(ColumnStatus::Done, 7)];
        assert_eq!(next_order(&projects, ColumnStatus::Idea), 0);
    }

    #[test]
    fn next_order_follows_column_maximum_not_count() {
        let projects = vec![
            at(ColumnStatus::Idea, 2),
            at(ColumnStatus::Idea, 9),
            at(ColumnStatus::InProgress, 40),
        ];
        assert_eq!(next_order(&projects, ColumnStatus::Idea), 10);
    }
}
