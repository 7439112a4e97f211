use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use once_cell::sync::Lazy;

use crate::grid::persist;
use crate::grid::store::EmployeeMonthSummary;
use crate::state::{self, AppState};

/// Saved-summary read cache keyed by `YYYY-MM`. Writes invalidate their
/// month; everything else ages out on TTL.
pub static SUMMARY_CACHE: Lazy<Cache<String, Arc<Vec<EmployeeMonthSummary>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(64)
        .time_to_live(Duration::from_secs(300))
        .build()
});

pub async fn get(month: &str) -> Option<Arc<Vec<EmployeeMonthSummary>>> {
    SUMMARY_CACHE.get(&month.to_string()).await
}

pub async fn put(month: &str, summaries: Arc<Vec<EmployeeMonthSummary>>) {
    SUMMARY_CACHE.insert(month.to_string(), summaries).await;
}

pub async fn invalidate(month: &str) {
    SUMMARY_CACHE.invalidate(&month.to_string()).await;
}

/// Primes the cache with every month currently present in the saved store.
pub async fn warmup(state: &AppState) {
    let months: Vec<(String, Arc<Vec<EmployeeMonthSummary>>)> = {
        let saved = state::read(&state.saved);
        saved
            .iter()
            .map(|(month, rows)| (month.clone(), Arc::new(persist::summarize(rows))))
            .collect()
    };

    let total = months.len();
    let inserts: Vec<_> = months
        .into_iter()
        .map(|(month, summaries)| SUMMARY_CACHE.insert(month, summaries))
        .collect();
    futures::future::join_all(inserts).await;

    log::info!("Summary cache warmup complete: {} saved months", total);
}
