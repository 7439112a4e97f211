use crate::api::attendance::{AttendanceQuery, AttendanceSummaryResponse, SaveAttendanceRequest};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::grid::{
    GridSnapshot, OpenGridRequest, RangeFillRequest, SetCellRequest, StatusOption,
};
use crate::api::holiday::{CreateHoliday, HolidayListResponse, HolidayQuery};
use crate::api::project::{
    BoardColumnView, BoardMoveRequest, BoardResponse, CreateProject, ProjectListResponse,
    UpdateProjectStatus,
};
use crate::grid::calendar::{CalendarDay, WeekBucket};
use crate::grid::persist::FlatAttendanceRecord;
use crate::grid::record::{DayDetail, EmployeeAttendanceRecord, StatusCounters};
use crate::grid::store::{EmployeeMonthSummary, SavedDayStatus};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::holiday::Holiday;
use crate::model::project::{Project, ProjectStatus};
use crate::model::status::AttendanceStatus;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRM Attendance API",
        version = "1.0.0",
        description = r#"
## CRM Attendance & Projects Backend

This API powers the attendance and project-board modules of a business CRM.

### 🔹 Key Features
- **Attendance Grid**
  - Open a month, edit cells and ranges, save the whole grid in one request
  - Per-status counters kept consistent with the day map on every edit
- **Attendance Store**
  - Load saved monthly summaries and submit flat attendance records
- **Masters**
  - Employee roster and holiday calendar
- **Project Board**
  - Kanban ordering with optimistic cross-column status updates

### 📦 Response Format
- JSON-based RESTful responses
- Errors are reported as `{"message": ...}` or `{"error": ...}` bodies

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,

        crate::api::holiday::list_holidays,
        crate::api::holiday::create_holiday,

        crate::api::attendance::get_attendance,
        crate::api::attendance::save_attendance,

        crate::api::grid::open_grid,
        crate::api::grid::get_grid,
        crate::api::grid::set_cell,
        crate::api::grid::fill_range,
        crate::api::grid::save_grid,
        crate::api::grid::list_statuses,

        crate::api::project::list_projects,
        crate::api::project::create_project,
        crate::api::project::update_project_status,
        crate::api::project::get_board,
        crate::api::project::move_card
    ),
    components(
        schemas(
            Employee,
            EmployeeStatus,
            ProjectStatus,
            EmployeeQuery,
            EmployeeListResponse,
            CreateEmployee,
            Holiday,
            HolidayQuery,
            HolidayListResponse,
            CreateHoliday,
            AttendanceStatus,
            AttendanceQuery,
            AttendanceSummaryResponse,
            SaveAttendanceRequest,
            FlatAttendanceRecord,
            EmployeeMonthSummary,
            SavedDayStatus,
            CalendarDay,
            WeekBucket,
            DayDetail,
            StatusCounters,
            EmployeeAttendanceRecord,
            GridSnapshot,
            OpenGridRequest,
            SetCellRequest,
            RangeFillRequest,
            StatusOption,
            Project,
            ProjectListResponse,
            CreateProject,
            UpdateProjectStatus,
            BoardColumnView,
            BoardResponse,
            BoardMoveRequest
        )
    ),
    tags(
        (name = "Employee", description = "Employee roster APIs"),
        (name = "Masters", description = "Holiday master APIs"),
        (name = "Attendance", description = "Saved attendance load/save APIs"),
        (name = "Attendance Grid", description = "Monthly grid session APIs"),
        (name = "Projects", description = "Project and Kanban board APIs"),
    )
)]
pub struct ApiDoc;
