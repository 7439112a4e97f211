use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::model::project::{Project, ProjectStatus};

/// Which side of the hovered card the dragged card lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DropSide {
    Before,
    After,
}

/// Insertion side from pointer Y relative to the hovered card's midpoint.
pub fn insertion_side(pointer_y: f64, card_top: f64, card_height: f64) -> DropSide {
    if pointer_y < card_top + card_height / 2.0 {
        DropSide::Before
    } else {
        DropSide::After
    }
}

/// A resolved drop. `from == to` is a same-column reorder, which is a local
/// ordering instruction only and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMove {
    pub project_id: u64,
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

impl BoardMove {
    pub fn is_cross_column(&self) -> bool {
        self.from != self.to
    }
}

/// Per-column ordered project lists, rendered independently of the
/// authoritative `status` field on each project. Every project id lives in
/// exactly one column's list at a time.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BoardOrder {
    #[schema(value_type = Object)]
    columns: BTreeMap<ProjectStatus, Vec<u64>>,
    #[serde(skip)]
    dragging: Option<u64>,
}

impl BoardOrder {
    /// Rebuilds the order from the authoritative project list, keeping the
    /// input order within each column.
    pub fn rebuild(projects: &[Project]) -> Self {
        let mut columns: BTreeMap<ProjectStatus, Vec<u64>> = ProjectStatus::iter()
            .map(|status| (status, Vec::new()))
            .collect();
        for project in projects {
            if let Some(column) = columns.get_mut(&project.status) {
                column.push(project.id);
            }
        }
        BoardOrder {
            columns,
            dragging: None,
        }
    }

    pub fn column(&self, status: ProjectStatus) -> &[u64] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn column_of(&self, project_id: u64) -> Option<ProjectStatus> {
        self.columns
            .iter()
            .find(|(_, ids)| ids.contains(&project_id))
            .map(|(status, _)| *status)
    }

    pub fn begin_drag(&mut self, project_id: u64) {
        self.dragging = Some(project_id);
    }

    pub fn dragging(&self) -> Option<u64> {
        self.dragging
    }

    /// Drop onto another card: splice within the column or move across
    /// columns at the computed position. Returns `None` when either id is
    /// unknown or the drop targets the dragged card itself.
    pub fn drop_on_card(
        &mut self,
        project_id: u64,
        target_id: u64,
        side: DropSide,
    ) -> Option<BoardMove> {
        if project_id == target_id {
            self.dragging = None;
            return None;
        }
        let from = self.column_of(project_id)?;
        let to = self.column_of(target_id)?;

        self.remove(project_id, from);
        let column = self.columns.get_mut(&to)?;
        let target_pos = column.iter().position(|id| *id == target_id)?;
        let insert_at = match side {
            DropSide::Before => target_pos,
            DropSide::After => target_pos + 1,
        };
        column.insert(insert_at, project_id);
        self.dragging = None;

        Some(BoardMove {
            project_id,
            from,
            to,
        })
    }

    /// Drop onto empty column space: appends at the end of the destination.
    pub fn drop_on_column(&mut self, project_id: u64, to: ProjectStatus) -> Option<BoardMove> {
        let from = self.column_of(project_id)?;
        self.remove(project_id, from);
        self.columns.entry(to).or_default().push(project_id);
        self.dragging = None;
        Some(BoardMove {
            project_id,
            from,
            to,
        })
    }

    fn remove(&mut self, project_id: u64, column: ProjectStatus) {
        if let Some(ids) = self.columns.get_mut(&column) {
            ids.retain(|id| *id != project_id);
        }
    }
}

/// Optimistically sets the project's status to the destination column and
/// runs the persistence callback. On failure the status is rolled back; the
/// board list membership stays wherever the optimistic drop put it.
pub fn persist_cross_column_move<F>(
    projects: &mut [Project],
    mv: BoardMove,
    persist: F,
) -> Result<(), String>
where
    F: FnOnce(u64, ProjectStatus) -> Result<(), String>,
{
    if !mv.is_cross_column() {
        return Ok(());
    }
    let project = projects
        .iter_mut()
        .find(|p| p.id == mv.project_id)
        .ok_or_else(|| format!("project {} not found", mv.project_id))?;

    let prior = project.status;
    project.status = mv.to;

    if let Err(err) = persist(mv.project_id, mv.to) {
        project.status = prior;
        tracing::warn!(project_id = mv.project_id, error = %err, "status update rejected, rolled back");
        return Err(err);
    }
    Ok(())
}
