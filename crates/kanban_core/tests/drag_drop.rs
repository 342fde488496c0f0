use kanban_core::{
    resolve_drop, ColumnStatus, DropAction, DropTarget, FilterPatch, NewProject, ProjectStore,
};
use uuid::Uuid;

struct Board {
    store: ProjectStore,
    idea_a: Uuid,
    idea_b: Uuid,
    progress_a: Uuid,
}

fn board() -> Board {
    let mut store = ProjectStore::new();
    let idea_a = store
        .add_project(NewProject::new("idea a", ColumnStatus::Idea))
        .unwrap();
    let idea_b = store
        .add_project(NewProject::new("idea b", ColumnStatus::Idea))
        .unwrap();
    let progress_a = store
        .add_project(NewProject::new("progress a", ColumnStatus::InProgress))
        .unwrap();
    store.add_project(NewProject::new("progress b", ColumnStatus::InProgress));
    Board {
        store,
        idea_a,
        idea_b,
        progress_a,
    }
}

fn resolve(store: &ProjectStore, dragged: Uuid, target: DropTarget) -> Option<DropAction> {
    resolve_drop(store.projects(), store.filter(), dragged, target)
}

#[test]
fn drop_on_other_column_appends_after_visible_projects() {
    let board = board();
    let action = resolve(&board.store, board.idea_a, DropTarget::Column(ColumnStatus::InProgress));

    assert_eq!(
        action,
        Some(DropAction::Move {
            id: board.idea_a,
            status: ColumnStatus::InProgress,
            order: 2,
        })
    );
}

#[test]
fn drop_on_project_in_other_column_moves_into_its_column() {
    let board = board();
    let action = resolve(&board.store, board.idea_b, DropTarget::Project(board.progress_a));

    assert_eq!(
        action,
        Some(DropAction::Move {
            id: board.idea_b,
            status: ColumnStatus::InProgress,
            order: 2,
        })
    );
}

#[test]
fn cross_column_order_counts_only_visible_projects() {
    let mut board = board();
    board.store.set_filter(FilterPatch::search("progress a"));
    let action = resolve(&board.store, board.idea_a, DropTarget::Column(ColumnStatus::InProgress));

    assert!(matches!(action, Some(DropAction::Move { order: 1, .. })));
}

#[test]
fn drop_on_project_in_same_column_copies_its_order() {
    let board = board();
    let action = resolve(&board.store, board.idea_b, DropTarget::Project(board.idea_a));

    assert_eq!(
        action,
        Some(DropAction::Reorder {
            id: board.idea_b,
            order: 0,
        })
    );
}

#[test]
fn drops_that_change_nothing_resolve_to_none() {
    let board = board();

    assert_eq!(resolve(&board.store, board.idea_a, DropTarget::Project(board.idea_a)), None);
    assert_eq!(
        resolve(&board.store, board.idea_a, DropTarget::Column(ColumnStatus::Idea)),
        None
    );
    assert_eq!(
        resolve(&board.store, board.idea_a, DropTarget::Project(Uuid::new_v4())),
        None
    );
    assert_eq!(
        resolve(&board.store, Uuid::new_v4(), DropTarget::Column(ColumnStatus::Done)),
        None
    );
}

#[test]
fn applying_a_move_updates_the_store() {
    let mut board = board();
    let action = resolve(&board.store, board.idea_a, DropTarget::Column(ColumnStatus::Done)).unwrap();

    assert!(board.store.apply_drop(action));
    let moved = board.store.project(board.idea_a).unwrap();
    assert_eq!(moved.status, ColumnStatus::Done);
    assert_eq!(moved.order, 0);
    assert_eq!(board.store.board().column(ColumnStatus::Idea).len(), 1);
}

#[test]
fn applying_a_reorder_places_dragged_after_target_with_shared_order() {
    let mut board = board();
    let action = resolve(&board.store, board.idea_b, DropTarget::Project(board.idea_a)).unwrap();

    assert!(board.store.apply_drop(action));
    let view = board.store.board();
    let ids = view
        .column(ColumnStatus::Idea)
        .iter()
        .map(|project| project.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, [board.idea_a, board.idea_b]);
    assert_eq!(
        board.store.project(board.idea_a).unwrap().order,
        board.store.project(board.idea_b).unwrap().order
    );
}
