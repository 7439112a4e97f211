use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Board columns correspond 1:1 with this status field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn title(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "project_code": "PRJ-007",
        "name": "Warehouse CRM rollout",
        "status": "planning"
    })
)]
pub struct Project {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = "PRJ-007")]
    pub project_code: String,

    #[schema(example = "Warehouse CRM rollout")]
    pub name: String,

    #[schema(example = "planning")]
    pub status: ProjectStatus,
}
