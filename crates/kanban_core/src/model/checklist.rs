//! Checklist items and checklist-derived progress.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one checklist item.
pub type ChecklistItemId = Uuid;

/// One entry of a project checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    pub checked: bool,
}

impl ChecklistItem {
    /// Creates an unchecked item with a generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            checked: false,
        }
    }
}

/// Returns the completion percentage of a checklist.
///
/// `round(100 * checked / total)` for a non-empty checklist, `0` otherwise.
/// Halves round away from zero.
pub fn calculate_progress(checklist: &[ChecklistItem]) -> u8 {
    if checklist.is_empty() {
        return 0;
    }
    let checked = checklist.iter().filter(|item| item.checked).count();
    let percent = (checked as f64 / checklist.len() as f64 * 100.0).round();
    percent as u8
}

#[cfg(test)]
mod tests {
    use super::{calculate_progress, ChecklistItem};

    fn items(states: &[bool]) -> Vec<ChecklistItem> {
        states
            .iter()
            .enumerate()
            .map(|(index, checked)| ChecklistItem {
                checked: *checked,
                ..ChecklistItem::new(format!("item {index}"))
            })
            .collect()
    }

    #[test]
    fn empty_checklist_has_zero_progress() {
        assert_eq!(calculate_progress(&[]), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(calculate_progress(&items(&[true, false, false])), 33);
        assert_eq!(calculate_progress(&items(&[true, true, false])), 67);
        assert_eq!(calculate_progress(&items(&[true, false])), 50);
        assert_eq!(calculate_progress(&items(&[true, true])), 100);
    }

    #[test]
    fn new_item_starts_unchecked_with_unique_id() {
        let first = ChecklistItem::new("write tests");
        let second = ChecklistItem::new("write tests");
        assert!(!first.checked);
        assert_ne!(first.id, second.id);
    }
}
