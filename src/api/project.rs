use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::board::{self, DropSide};
use crate::model::project::{Project, ProjectStatus};
use crate::state::{self, AppState};

#[derive(Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub data: Vec<Project>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateProject {
    #[schema(example = "PRJ-007")]
    pub project_code: String,

    #[schema(example = "Warehouse CRM rollout")]
    pub name: String,

    #[schema(example = "planning", nullable = true)]
    pub status: Option<ProjectStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProjectStatus {
    #[schema(example = "completed")]
    pub status: ProjectStatus,
}

#[derive(Serialize, ToSchema)]
pub struct BoardColumnView {
    #[schema(example = "planning")]
    pub id: ProjectStatus,

    #[schema(example = "Planning")]
    pub title: String,

    pub projects: Vec<Project>,
}

#[derive(Serialize, ToSchema)]
pub struct BoardResponse {
    pub columns: Vec<BoardColumnView>,
}

/// Drop description from the client: either over a card (with pointer
/// geometry for the before/after decision) or onto empty column space.
#[derive(Deserialize, ToSchema)]
pub struct BoardMoveRequest {
    #[schema(example = 7)]
    pub project_id: u64,

    #[schema(example = 3, nullable = true)]
    pub over_card: Option<u64>,

    #[schema(example = 118.0, nullable = true)]
    pub pointer_y: Option<f64>,

    #[schema(example = 100.0, nullable = true)]
    pub card_top: Option<f64>,

    #[schema(example = 40.0, nullable = true)]
    pub card_height: Option<f64>,

    #[schema(example = "completed", nullable = true)]
    pub to_column: Option<ProjectStatus>,
}

/// List projects
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "All projects", body = ProjectListResponse)
    ),
    tag = "Projects"
)]
pub async fn list_projects(state: web::Data<AppState>) -> impl Responder {
    let projects = state::read(&state.projects);
    HttpResponse::Ok().json(ProjectListResponse {
        data: projects.clone(),
    })
}

/// Create project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProject,
    responses(
        (status = 201, description = "Project created")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    state: web::Data<AppState>,
    payload: web::Json<CreateProject>,
) -> impl Responder {
    let id = state.next_id();
    let payload = payload.into_inner();
    let project = Project {
        id,
        project_code: payload.project_code,
        name: payload.name,
        status: payload.status.unwrap_or(ProjectStatus::Planning),
    };

    let mut projects = state::write(&state.projects);
    projects.push(project);
    *state::write(&state.board) = board::BoardOrder::rebuild(&projects);

    HttpResponse::Created().json(json!({
        "message": "Project created successfully",
        "id": id
    }))
}

/// Direct status update; the board column membership follows the new status.
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    request_body = UpdateProjectStatus,
    params(
        ("id", description = "Project ID")
    ),
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn update_project_status(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<UpdateProjectStatus>,
) -> impl Responder {
    let project_id = path.into_inner();

    let mut projects = state::write(&state.projects);
    let Some(project) = projects.iter_mut().find(|p| p.id == project_id) else {
        return HttpResponse::NotFound().json(json!({
            "message": "Project not found"
        }));
    };

    let changed = project.status != payload.status;
    project.status = payload.status;
    if changed {
        let _ = state::write(&state.board).drop_on_column(project_id, payload.status);
    }

    HttpResponse::Ok().json(json!({
        "message": "Project status updated successfully"
    }))
}

/// Kanban board: one column per status, ordered project lists.
#[utoipa::path(
    get,
    path = "/api/projects/board",
    responses(
        (status = 200, description = "Board columns", body = BoardResponse)
    ),
    tag = "Projects"
)]
pub async fn get_board(state: web::Data<AppState>) -> impl Responder {
    let projects = state::read(&state.projects);
    let board = state::read(&state.board);

    let columns = ProjectStatus::iter()
        .map(|status| BoardColumnView {
            id: status,
            title: status.title().to_string(),
            projects: board
                .column(status)
                .iter()
                .filter_map(|id| projects.iter().find(|p| p.id == *id).cloned())
                .collect(),
        })
        .collect();

    HttpResponse::Ok().json(BoardResponse { columns })
}

/// Applies a drop: same-column reorder stays local; a cross-column move sets
/// the project's status optimistically and rolls it back if the repository
/// update is rejected.
#[utoipa::path(
    post,
    path = "/api/projects/board/move",
    request_body = BoardMoveRequest,
    responses(
        (status = 200, description = "Drop applied", body = Object, example = json!({
            "message": "Card moved",
            "status": "completed"
        })),
        (status = 400, description = "Unresolvable drop target"),
        (status = 409, description = "Update rejected; status rolled back")
    ),
    tag = "Projects"
)]
pub async fn move_card(
    state: web::Data<AppState>,
    payload: web::Json<BoardMoveRequest>,
) -> impl Responder {
    let mut projects = state::write(&state.projects);
    let mut board_state = state::write(&state.board);

    board_state.begin_drag(payload.project_id);
    let mv = match (payload.over_card, payload.to_column) {
        (Some(target), _) => {
            let side = match (payload.pointer_y, payload.card_top, payload.card_height) {
                (Some(y), Some(top), Some(height)) => board::insertion_side(y, top, height),
                _ => DropSide::After,
            };
            board_state.drop_on_card(payload.project_id, target, side)
        }
        (None, Some(column)) => board_state.drop_on_column(payload.project_id, column),
        (None, None) => None,
    };

    let Some(mv) = mv else {
        return HttpResponse::BadRequest().json(json!({
            "message": "Drop target could not be resolved"
        }));
    };

    if !mv.is_cross_column() {
        return HttpResponse::Ok().json(json!({
            "message": "Card reordered",
            "status": mv.to
        }));
    }

    let known: Vec<u64> = projects.iter().map(|p| p.id).collect();
    let result = board::persist_cross_column_move(&mut projects, mv, |id, _| {
        if known.contains(&id) {
            Ok(())
        } else {
            Err(format!("project {id} no longer exists"))
        }
    });

    match result {
        Ok(()) => HttpResponse::Ok().json(json!({
            "message": "Card moved",
            "status": mv.to
        })),
        Err(message) => HttpResponse::Conflict().json(json!({
            "message": message,
            "rolled_back": true
        })),
    }
}
