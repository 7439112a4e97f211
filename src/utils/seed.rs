use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};

use crate::grid::calendar::MonthKey;
use crate::grid::persist;
use crate::grid::record::OvertimePolicy;
use crate::grid::store::AttendanceGrid;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::holiday::Holiday;
use crate::model::project::{Project, ProjectStatus};
use crate::state::{self, AppState};

fn demo_employees(state: &AppState) -> Vec<Employee> {
    let names: [(&str, Option<&str>); 6] = [
        ("Asha", Some("Verma")),
        ("Ravi", Some("Iyer")),
        ("Meera", Some("Shah")),
        ("Karan", None),
        ("Divya", Some("Nair")),
        ("Sanjay", Some("Kulkarni")),
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, (first, last))| {
            let id = state.next_id();
            Employee {
                id,
                employee_code: format!("EMP-{:03}", i + 1),
                first_name: (*first).to_string(),
                last_name: last.map(str::to_string),
                email: format!("{}@example.com", first.to_lowercase()),
                phone: None,
                hire_date: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap_or_default(),
                status: EmployeeStatus::Active,
            }
        })
        .collect()
}

fn demo_holidays(state: &AppState, year: i32) -> Vec<Holiday> {
    let fixed = [
        (1, 1, "New Year"),
        (1, 26, "Republic Day"),
        (8, 15, "Independence Day"),
        (10, 2, "Gandhi Jayanti"),
        (12, 25, "Christmas"),
    ];
    fixed
        .iter()
        .filter_map(|(month, day, name)| {
            Some(Holiday {
                id: state.next_id(),
                date: NaiveDate::from_ymd_opt(year, *month, *day)?,
                name: (*name).to_string(),
            })
        })
        .collect()
}

fn demo_projects(state: &AppState) -> Vec<Project> {
    let seedlist = [
        ("Warehouse CRM rollout", ProjectStatus::Planning),
        ("Quotation templates v2", ProjectStatus::Planning),
        ("Payroll reconciliation", ProjectStatus::InProgress),
        ("Messaging archive", ProjectStatus::OnHold),
        ("Lead import pipeline", ProjectStatus::Completed),
    ];
    seedlist
        .iter()
        .enumerate()
        .map(|(i, (name, status))| Project {
            id: state.next_id(),
            project_code: format!("PRJ-{:03}", i + 1),
            name: (*name).to_string(),
            status: *status,
        })
        .collect()
}

/// Populates the in-memory masters with demo data and pre-saves the current
/// month's default attendance so the load endpoints answer out of the box.
pub fn seed_demo_data(state: &AppState, policy: OvertimePolicy) -> Result<()> {
    let today = Local::now().date_naive();
    let month = MonthKey::new(today.year(), today.month0())
        .context("current date out of calendar range")?;

    let employees = demo_employees(state);
    let holidays = demo_holidays(state, today.year());
    let projects = demo_projects(state);

    let holiday_set = holidays.iter().map(|h| h.date).collect();
    let grid = AttendanceGrid::initialize(month, &employees, &holiday_set, policy);
    let rows = persist::flatten(&grid).context("seed grid flattened to nothing")?;
    let row_count = rows.len();

    *state::write(&state.board) = crate::board::BoardOrder::rebuild(&projects);
    *state::write(&state.employees) = employees;
    *state::write(&state.holidays) = holidays;
    *state::write(&state.projects) = projects;
    state::write(&state.saved).insert(month.to_string(), rows);

    log::info!(
        "Demo seed complete: {} attendance rows saved for {}",
        row_count,
        month
    );
    Ok(())
}
