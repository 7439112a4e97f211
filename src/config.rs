use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::grid::persist::parse_hhmm;
use crate::grid::record::OvertimePolicy;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_api_per_min: u32,

    // Overtime policy
    pub shift_end: NaiveTime,
    pub ot_day_hours: f64,

    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            shift_end: env::var("SHIFT_END")
                .ok()
                .and_then(|raw| parse_hhmm(&raw))
                .unwrap_or_else(|| OvertimePolicy::default().shift_end),

            ot_day_hours: env::var("OT_DAY_HOURS")
                .unwrap_or_else(|_| "8.0".to_string())
                .parse()
                .unwrap(),

            seed_demo: env::var("SEED_DEMO")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap(),
        }
    }

    pub fn overtime_policy(&self) -> OvertimePolicy {
        OvertimePolicy {
            shift_end: self.shift_end,
            ot_day_hours: self.ot_day_hours,
        }
    }
}
