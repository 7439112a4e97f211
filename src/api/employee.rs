use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::model::employee::{Employee, EmployeeStatus};
use crate::state::{self, AppState};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    #[schema(example = 100)]
    pub limit: Option<usize>,

    #[schema(example = "active")]
    pub status: Option<EmployeeStatus>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub employees: Vec<Employee>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-007")]
    pub employee_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe", nullable = true)]
    pub last_name: Option<String>,

    #[schema(example = "john@email.com", format = "email")]
    pub email: String,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,

    #[schema(example = "active", nullable = true)]
    pub status: Option<EmployeeStatus>,
}

/// List the roster in insertion order, optionally filtered by status and
/// capped by limit.
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employee roster", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<EmployeeQuery>,
) -> impl Responder {
    let employees = state::read(&state.employees);
    let limit = query.limit.unwrap_or(usize::MAX);

    let filtered: Vec<Employee> = employees
        .iter()
        .filter(|e| query.status.map_or(true, |s| e.status == s))
        .take(limit)
        .cloned()
        .collect();

    HttpResponse::Ok().json(EmployeeListResponse {
        employees: filtered,
    })
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created successfully",
            "id": 7
        })),
        (status = 400, description = "Duplicate employee code", body = Object, example = json!({
            "message": "Employee code already exists"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    state: web::Data<AppState>,
    payload: web::Json<CreateEmployee>,
) -> impl Responder {
    let mut employees = state::write(&state.employees);

    if employees
        .iter()
        .any(|e| e.employee_code == payload.employee_code)
    {
        return HttpResponse::BadRequest().json(json!({
            "message": "Employee code already exists"
        }));
    }

    let id = state.next_id();
    let payload = payload.into_inner();
    employees.push(Employee {
        id,
        employee_code: payload.employee_code,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        hire_date: payload.hire_date,
        status: payload.status.unwrap_or(EmployeeStatus::Active),
    });

    HttpResponse::Created().json(json!({
        "message": "Employee created successfully",
        "id": id
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    fn sample(state: &AppState) {
        let mut employees = state::write(&state.employees);
        for (i, status) in [
            EmployeeStatus::Active,
            EmployeeStatus::Active,
            EmployeeStatus::Inactive,
        ]
        .iter()
        .enumerate()
        {
            employees.push(Employee {
                id: state.next_id(),
                employee_code: format!("EMP-{:03}", i + 1),
                first_name: format!("Emp{i}"),
                last_name: None,
                email: format!("emp{i}@example.com"),
                phone: None,
                hire_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                status: *status,
            });
        }
    }

    #[actix_web::test]
    async fn active_filter_and_limit_apply() {
        let state = web::Data::new(AppState::new());
        sample(&state);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .route("/employees", web::get().to(list_employees)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/employees?status=active")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["employees"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get().uri("/employees?limit=1").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["employees"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn duplicate_employee_code_is_rejected() {
        let state = web::Data::new(AppState::new());
        sample(&state);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .route("/employees", web::post().to(create_employee)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees")
            .set_json(json!({
                "employee_code": "EMP-001",
                "first_name": "Dup",
                "email": "dup@example.com",
                "hire_date": "2026-01-01"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
