use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::BoardOrder;
use crate::grid::persist::FlatAttendanceRecord;
use crate::grid::store::AttendanceGrid;
use crate::model::employee::Employee;
use crate::model::holiday::Holiday;
use crate::model::project::Project;

/// All mutable state, owned by the single server process. Each map sits
/// behind its own `RwLock`; a reconciliation operation holds the write lock
/// for its whole duration so every update lands as one ordered snapshot.
pub struct AppState {
    pub employees: RwLock<Vec<Employee>>,
    pub holidays: RwLock<Vec<Holiday>>,
    pub projects: RwLock<Vec<Project>>,
    pub board: RwLock<BoardOrder>,
    /// Saved attendance rows keyed by `YYYY-MM`. A save replaces the whole
    /// month, mirroring the single-request submission shape.
    pub saved: RwLock<HashMap<String, Vec<FlatAttendanceRecord>>>,
    /// The grid for the currently displayed month, if one is open. Month
    /// navigation replaces it wholesale.
    pub grid: RwLock<Option<AttendanceGrid>>,
    next_id: AtomicU64,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            employees: RwLock::new(Vec::new()),
            holidays: RwLock::new(Vec::new()),
            projects: RwLock::new(Vec::new()),
            board: RwLock::new(BoardOrder::default()),
            saved: RwLock::new(HashMap::new()),
            grid: RwLock::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

/// Lock helpers that recover from poisoning instead of propagating a panic
/// from an unrelated request.
pub fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
