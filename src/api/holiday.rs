use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::model::holiday::Holiday;
use crate::state::{self, AppState};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HolidayQuery {
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct HolidayListResponse {
    pub data: Vec<Holiday>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "2026-01-26", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "Republic Day")]
    pub name: String,
}

/// Holiday master, filterable by year
#[utoipa::path(
    get,
    path = "/api/masters/holidays",
    params(HolidayQuery),
    responses(
        (status = 200, description = "Holiday master", body = HolidayListResponse)
    ),
    tag = "Masters"
)]
pub async fn list_holidays(
    state: web::Data<AppState>,
    query: web::Query<HolidayQuery>,
) -> impl Responder {
    let holidays = state::read(&state.holidays);
    let data: Vec<Holiday> = holidays
        .iter()
        .filter(|h| query.year.map_or(true, |y| h.date.year() == y))
        .cloned()
        .collect();

    HttpResponse::Ok().json(HolidayListResponse { data })
}

/// Add a holiday to the master
#[utoipa::path(
    post,
    path = "/api/masters/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created"),
        (status = 400, description = "Holiday already exists on that date")
    ),
    tag = "Masters"
)]
pub async fn create_holiday(
    state: web::Data<AppState>,
    payload: web::Json<CreateHoliday>,
) -> impl Responder {
    let mut holidays = state::write(&state.holidays);

    if holidays.iter().any(|h| h.date == payload.date) {
        return HttpResponse::BadRequest().json(json!({
            "message": "Holiday already exists on that date"
        }));
    }

    let id = state.next_id();
    holidays.push(Holiday {
        id,
        date: payload.date,
        name: payload.name.clone(),
    });

    HttpResponse::Created().json(json!({
        "message": "Holiday created successfully",
        "id": id
    }))
}
