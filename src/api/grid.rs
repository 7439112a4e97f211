use std::collections::HashSet;

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::config::Config;
use crate::grid::GridError;
use crate::grid::calendar::{self, MonthKey, WeekBucket};
use crate::grid::persist::{self, parse_hhmm};
use crate::grid::record::{DayDetail, EmployeeAttendanceRecord};
use crate::grid::store::AttendanceGrid;
use crate::model::status::AttendanceStatus;
use crate::state::{self, AppState};
use crate::utils::summary_cache;

#[derive(Deserialize, ToSchema)]
pub struct OpenGridRequest {
    #[schema(example = "2024-02")]
    pub month: String,
}

#[derive(Serialize, ToSchema)]
pub struct GridSnapshot {
    #[schema(example = "2024-02")]
    pub month: String,

    pub load_token: String,
    pub version: u64,
    pub weeks: Vec<WeekBucket>,
    pub records: Vec<EmployeeAttendanceRecord>,
}

#[derive(Deserialize, ToSchema)]
pub struct SetCellRequest {
    pub status: AttendanceStatus,

    #[schema(example = "09:30", nullable = true)]
    pub in_time: Option<String>,

    #[schema(example = "19:00", nullable = true)]
    pub out_time: Option<String>,

    #[schema(example = "client visit", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RangeFillRequest {
    #[schema(example = "2024-02-05", format = "date", value_type = String)]
    pub from: NaiveDate,

    #[schema(example = "2024-02-09", format = "date", value_type = String)]
    pub to: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = "planned leave", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct StatusOption {
    #[schema(example = "PL")]
    pub code: String,
    #[schema(example = "PL")]
    pub label: String,
    #[schema(example = "Privileged Leave")]
    pub full_label: String,
    #[schema(example = "bg-blue-100 text-blue-800")]
    pub classes: String,
}

fn snapshot(grid: &AttendanceGrid) -> GridSnapshot {
    GridSnapshot {
        month: grid.month().to_string(),
        load_token: grid.load_token().to_string(),
        version: grid.version(),
        weeks: calendar::week_buckets(grid.calendar()),
        records: grid.records().cloned().collect(),
    }
}

fn grid_error(err: GridError) -> HttpResponse {
    match err {
        GridError::NoGridOpen | GridError::UnknownEmployee(_) => {
            HttpResponse::NotFound().json(json!({ "message": err.to_string() }))
        }
        GridError::OutsideMonth(_) | GridError::BadMonthKey(_) | GridError::EmptySubmission => {
            HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
        }
    }
}

fn detail_from(
    in_time: &Option<String>,
    out_time: &Option<String>,
    reason: &Option<String>,
) -> Result<Option<DayDetail>, String> {
    let parse = |raw: &Option<String>, field: &str| -> Result<Option<chrono::NaiveTime>, String> {
        match raw {
            Some(s) => parse_hhmm(s)
                .map(Some)
                .ok_or_else(|| format!("invalid {field}: {s}")),
            None => Ok(None),
        }
    };
    let detail = DayDetail {
        in_time: parse(in_time, "inTime")?,
        out_time: parse(out_time, "outTime")?,
        reason: reason.clone(),
    };
    Ok(if detail.is_empty() { None } else { Some(detail) })
}

/// Opens the grid for a month: default-initializes every active employee and
/// then merges whatever the store has saved for that month. Replaces any
/// previously open grid.
#[utoipa::path(
    post,
    path = "/api/attendance/grid",
    request_body = OpenGridRequest,
    responses(
        (status = 200, description = "Grid opened", body = GridSnapshot),
        (status = 400, description = "Malformed month key")
    ),
    tag = "Attendance Grid"
)]
pub async fn open_grid(
    state: web::Data<AppState>,
    config: web::Data<Config>,
    payload: web::Json<OpenGridRequest>,
) -> impl Responder {
    let month = match MonthKey::parse(&payload.month) {
        Ok(month) => month,
        Err(e) => return grid_error(e),
    };

    let roster = state::read(&state.employees).clone();
    let holidays: HashSet<NaiveDate> = state::read(&state.holidays)
        .iter()
        .filter(|h| month.contains(h.date))
        .map(|h| h.date)
        .collect();

    let mut grid = AttendanceGrid::initialize(month, &roster, &holidays, config.overtime_policy());

    let summaries = {
        let saved = state::read(&state.saved);
        saved
            .get(&month.to_string())
            .map(|rows| persist::summarize(rows))
            .unwrap_or_default()
    };
    grid.merge_saved(month, &summaries);

    let body = snapshot(&grid);
    *state::write(&state.grid) = Some(grid);

    tracing::info!(month = %month, employees = body.records.len(), "attendance grid opened");
    HttpResponse::Ok().json(body)
}

/// Current grid snapshot
#[utoipa::path(
    get,
    path = "/api/attendance/grid",
    responses(
        (status = 200, description = "Current grid", body = GridSnapshot),
        (status = 404, description = "No grid open")
    ),
    tag = "Attendance Grid"
)]
pub async fn get_grid(state: web::Data<AppState>) -> impl Responder {
    match state::read(&state.grid).as_ref() {
        Some(grid) => HttpResponse::Ok().json(snapshot(grid)),
        None => grid_error(GridError::NoGridOpen),
    }
}

/// Single-cell status update with optional in/out time and reason.
#[utoipa::path(
    put,
    path = "/api/attendance/grid/{employee_id}/{date}",
    request_body = SetCellRequest,
    params(
        ("employee_id", description = "Employee ID"),
        ("date", description = "ISO date within the displayed month")
    ),
    responses(
        (status = 200, description = "Cell updated", body = Object, example = json!({
            "message": "Cell updated",
            "version": 3
        })),
        (status = 400, description = "Date outside the displayed month"),
        (status = 404, description = "No grid open or unknown employee")
    ),
    tag = "Attendance Grid"
)]
pub async fn set_cell(
    state: web::Data<AppState>,
    path: web::Path<(u64, NaiveDate)>,
    payload: web::Json<SetCellRequest>,
) -> impl Responder {
    let (employee_id, date) = path.into_inner();

    let detail = match detail_from(&payload.in_time, &payload.out_time, &payload.reason) {
        Ok(detail) => detail,
        Err(message) => return HttpResponse::BadRequest().json(json!({ "error": message })),
    };

    let mut guard = state::write(&state.grid);
    let Some(grid) = guard.as_mut() else {
        return grid_error(GridError::NoGridOpen);
    };

    match grid.set_status(employee_id, date, payload.status, detail.as_ref()) {
        Ok(()) => HttpResponse::Ok().json(json!({
            "message": "Cell updated",
            "version": grid.version()
        })),
        Err(e) => grid_error(e),
    }
}

/// Fills an inclusive date range for one employee. Dates outside the
/// displayed month are dropped, not deferred to a later view.
#[utoipa::path(
    put,
    path = "/api/attendance/grid/{employee_id}",
    request_body = RangeFillRequest,
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Range applied", body = Object, example = json!({
            "applied": 5
        })),
        (status = 404, description = "No grid open or unknown employee")
    ),
    tag = "Attendance Grid"
)]
pub async fn fill_range(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<RangeFillRequest>,
) -> impl Responder {
    let employee_id = path.into_inner();
    let detail = payload.reason.as_ref().map(|reason| DayDetail {
        reason: Some(reason.clone()),
        ..DayDetail::default()
    });

    let mut guard = state::write(&state.grid);
    let Some(grid) = guard.as_mut() else {
        return grid_error(GridError::NoGridOpen);
    };

    match grid.apply_range(
        employee_id,
        payload.from,
        payload.to,
        payload.status,
        detail.as_ref(),
    ) {
        Ok(applied) => HttpResponse::Ok().json(json!({ "applied": applied })),
        Err(e) => grid_error(e),
    }
}

/// Flattens the open grid and saves it under its month key.
#[utoipa::path(
    post,
    path = "/api/attendance/grid/save",
    responses(
        (status = 200, description = "Grid saved", body = Object, example = json!({
            "successCount": 174,
            "month": "2024-02"
        })),
        (status = 400, description = "Nothing to save"),
        (status = 404, description = "No grid open")
    ),
    tag = "Attendance Grid"
)]
pub async fn save_grid(state: web::Data<AppState>) -> impl Responder {
    let (key, rows) = {
        let guard = state::read(&state.grid);
        let Some(grid) = guard.as_ref() else {
            return grid_error(GridError::NoGridOpen);
        };
        match persist::flatten(grid) {
            Ok(rows) => (grid.month().to_string(), rows),
            Err(e) => return grid_error(e),
        }
    };

    let count = rows.len();
    state::write(&state.saved).insert(key.clone(), rows);
    summary_cache::invalidate(&key).await;

    tracing::info!(month = %key, records = count, "attendance grid saved");
    HttpResponse::Ok().json(json!({ "successCount": count, "month": key }))
}

/// Status vocabulary for the cell selector.
#[utoipa::path(
    get,
    path = "/api/attendance/statuses",
    responses(
        (status = 200, description = "Attendance status vocabulary", body = [StatusOption])
    ),
    tag = "Attendance Grid"
)]
pub async fn list_statuses() -> impl Responder {
    let statuses: Vec<StatusOption> = AttendanceStatus::iter()
        .filter(|s| *s != AttendanceStatus::Unset)
        .map(|s| {
            let style = s.style();
            StatusOption {
                code: s.to_string(),
                label: style.label.to_string(),
                full_label: style.full_label.to_string(),
                classes: style.classes.to_string(),
            }
        })
        .collect();
    HttpResponse::Ok().json(statuses)
}
