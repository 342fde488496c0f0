//! Search, tag and priority filter state.

use crate::model::project::{Priority, Project};
use serde::{Deserialize, Serialize};

/// Active board filters. Predicates compose with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Case-insensitive substring over title and description. Empty = off.
    pub search_query: String,
    pub filter_tag: Option<String>,
    pub filter_priority: Option<Priority>,
}

/// Partial filter update merged by `ProjectStore::set_filter`.
///
/// Nested `Option`s distinguish "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search_query: Option<String>,
    pub filter_tag: Option<Option<String>>,
    pub filter_priority: Option<Option<Priority>>,
}

impl FilterPatch {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn tag(tag: Option<String>) -> Self {
        Self {
            filter_tag: Some(tag),
            ..Self::default()
        }
    }

    pub fn priority(priority: Option<Priority>) -> Self {
        Self {
            filter_priority: Some(priority),
            ..Self::default()
        }
    }
}

impl FilterState {
    /// Merges supplied fields; no validation.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(search_query) = patch.search_query {
            self.search_query = search_query;
        }
        if let Some(filter_tag) = patch.filter_tag {
            self.filter_tag = filter_tag;
        }
        if let Some(filter_priority) = patch.filter_priority {
            self.filter_priority = filter_priority;
        }
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty() || self.filter_tag.is_some() || self.filter_priority.is_some()
    }

    /// Returns whether `project` passes every active predicate.
    pub fn matches(&self, project: &Project) -> bool {
        self.matches_search(project) && self.matches_tag(project) && self.matches_priority(project)
    }

    fn matches_search(&self, project: &Project) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        project.title.to_lowercase().contains(&query)
            || project.description.to_lowercase().contains(&query)
    }

    fn matches_tag(&self, project: &Project) -> bool {
        match &self.filter_tag {
            Some(tag) => project.tags.iter().any(|candidate| candidate == tag),
            None => true,
        }
    }

    fn matches_priority(&self, project: &Project) -> bool {
        match self.filter_priority {
            Some(priority) => project.priority == priority,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterPatch, FilterState};
    use crate::model::project::{ColumnStatus, NewProject, Priority, Project};
    use chrono::Utc;
    use uuid::Uuid;

    fn project(title: &str, description: &str, tags: &[&str], priority: Priority) -> Project {
        let mut data = NewProject::new(title, ColumnStatus::Idea);
        data.description = description.to_string();
        data.tags = tags.iter().map(|tag| tag.to_string()).collect();
        data.priority = priority;
        Project::from_new(data, Uuid::new_v4(), 0, Utc::now())
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = FilterState::default();
        assert!(!filter.has_active_filters());
        assert!(filter.matches(&project("", "", &[], Priority::Low)));
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let filter = FilterState {
            search_query: "KANBAN".to_string(),
            ..FilterState::default()
        };
        assert!(filter.matches(&project("Kanban board", "", &[], Priority::Low)));
        assert!(filter.matches(&project("Board", "a kanban clone", &[], Priority::Low)));
        assert!(!filter.matches(&project("Board", "todo list", &[], Priority::Low)));
    }

    #[test]
    fn tag_filter_requires_exact_tag() {
        let filter = FilterState {
            filter_tag: Some("web".to_string()),
            ..FilterState::default()
        };
        assert!(filter.matches(&project("a", "", &["rust", "web"], Priority::Low)));
        assert!(!filter.matches(&project("a", "", &["webapp"], Priority::Low)));
    }

    #[test]
    fn patch_merges_and_clears_fields() {
        let mut filter = FilterState::default();
        filter.apply(FilterPatch {
            search_query: Some("api".to_string()),
            filter_tag: Some(Some("web".to_string())),
            filter_priority: Some(Some(Priority::High)),
        });
        assert!(filter.has_active_filters());

        filter.apply(FilterPatch::tag(None));
        assert_eq!(filter.filter_tag, None);
        assert_eq!(filter.search_query, "api");
        assert_eq!(filter.filter_priority, Some(Priority::High));
    }
}
