pub mod seed;
pub mod summary_cache;
