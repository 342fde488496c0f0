//! Column grouping of visible projects.

use crate::board::filter::FilterState;
use crate::model::project::{ColumnStatus, Project};
use std::collections::BTreeSet;

/// Visible projects grouped by column, each sorted by `order` ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    columns: [Vec<&'a Project>; 3],
}

impl<'a> BoardView<'a> {
    /// Filters `projects` and groups survivors by column.
    ///
    /// The per-column sort is stable, so equal `order` values keep their
    /// relative position in `projects`.
    pub fn build(projects: &'a [Project], filter: &FilterState) -> Self {
        let mut columns: [Vec<&'a Project>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for project in projects.iter().filter(|project| filter.matches(project)) {
            columns[project.status.index()].push(project);
        }
        for column in &mut columns {
            column.sort_by_key(|project| project.order);
        }
        Self { columns }
    }

    /// Visible projects of one column in display order.
    pub fn column(&self, status: ColumnStatus) -> &[&'a Project] {
        &self.columns[status.index()]
    }

    /// Iterates columns in board display order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnStatus, &[&'a Project])> + '_ {
        ColumnStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }
}

/// Sorted, de-duplicated tag vocabulary across all projects.
pub fn all_tags(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|project| project.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
