//! Drag-and-drop move resolution.
//!
//! # Invariants
//! - Cross-column drops always append: the new order is the number of
//!   visible projects already in the destination column.
//! - Same-column drops copy the displaced project's `order` onto the dragged
//!   project. Both then share one value and the stable column sort decides
//!   their relative position.

use crate::board::filter::FilterState;
use crate::board::view::BoardView;
use crate::model::project::{ColumnStatus, Project, ProjectId};

/// What a card was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty area of a column.
    Column(ColumnStatus),
    /// Another card.
    Project(ProjectId),
}

/// Store mutation implied by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Cross-column move, applied with `ProjectStore::move_project`.
    Move {
        id: ProjectId,
        status: ColumnStatus,
        order: i64,
    },
    /// Same-column reorder, applied with `ProjectStore::reorder_project`.
    Reorder { id: ProjectId, order: i64 },
}

/// Resolves a drop of `dragged` on `target`.
///
/// Returns `None` when nothing should change: unknown dragged or target
/// project, a drop on the card itself, or a drop on the empty area of the
/// card's own column.
pub fn resolve_drop(
    projects: &[Project],
    filter: &FilterState,
    dragged: ProjectId,
    target: DropTarget,
) -> Option<DropAction> {
    let dragged_project = find(projects, dragged)?;

    let (target_status, over_project) = match target {
        DropTarget::Column(status) => (status, None),
        DropTarget::Project(over_id) => {
            let over = find(projects, over_id)?;
            (over.status, Some(over))
        }
    };

    if target_status != dragged_project.status {
        let view = BoardView::build(projects, filter);
        let order = view.column(target_status).len() as i64;
        return Some(DropAction::Move {
            id: dragged,
            status: target_status,
            order,
        });
    }

    match over_project {
        Some(over) if over.id != dragged => Some(DropAction::Reorder {
            id: dragged,
            order: over.order,
        }),
        _ => None,
    }
}

fn find(projects: &[Project], id: ProjectId) -> Option<&Project> {
    projects.iter().find(|project| project.id == id)
}
