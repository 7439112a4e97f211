use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::grid::calendar::MonthKey;
use crate::grid::persist::{self, FlatAttendanceRecord};
use crate::grid::store::EmployeeMonthSummary;
use crate::state::{self, AppState};
use crate::utils::summary_cache;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    #[schema(example = "2024-02")]
    pub month: String,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceSummaryResponse {
    pub summary: Vec<EmployeeMonthSummary>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveAttendanceRequest {
    pub attendance_records: Vec<FlatAttendanceRecord>,

    #[schema(example = "2024-02")]
    pub month: String,
}

/// Saved monthly summaries, one entry per employee found in the store.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Saved summaries for the month", body = AttendanceSummaryResponse),
        (status = 400, description = "Malformed month key")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> impl Responder {
    let month = match MonthKey::parse(&query.month) {
        Ok(month) => month,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({ "error": e.to_string() }));
        }
    };
    let key = month.to_string();

    let summaries = match summary_cache::get(&key).await {
        Some(cached) => cached,
        None => {
            let built = {
                let saved = state::read(&state.saved);
                Arc::new(
                    saved
                        .get(&key)
                        .map(|rows| persist::summarize(rows))
                        .unwrap_or_default(),
                )
            };
            summary_cache::put(&key, built.clone()).await;
            built
        }
    };

    HttpResponse::Ok().json(AttendanceSummaryResponse {
        summary: summaries.as_ref().clone(),
    })
}

/// Replaces the month's saved records with the submitted flat list.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = SaveAttendanceRequest,
    responses(
        (status = 200, description = "Records saved", body = Object, example = json!({
            "successCount": 174
        })),
        (status = 400, description = "Empty submission or malformed month", body = Object, example = json!({
            "error": "no attendance records to save"
        }))
    ),
    tag = "Attendance"
)]
pub async fn save_attendance(
    state: web::Data<AppState>,
    payload: web::Json<SaveAttendanceRequest>,
) -> impl Responder {
    // Zero records would wipe the month; reject before touching the store.
    if payload.attendance_records.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "no attendance records to save"
        }));
    }
    let month = match MonthKey::parse(&payload.month) {
        Ok(month) => month,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({ "error": e.to_string() }));
        }
    };

    let key = month.to_string();
    let payload = payload.into_inner();
    let count = payload.attendance_records.len();

    state::write(&state.saved).insert(key.clone(), payload.attendance_records);
    summary_cache::invalidate(&key).await;

    tracing::info!(month = %key, records = count, "attendance saved");
    HttpResponse::Ok().json(json!({ "successCount": count }))
}
