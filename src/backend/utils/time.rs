use crate::models::common::TimestampNs;
use chrono::DateTime;

pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Returns the current Internet Computer time as nanoseconds since epoch.
#[cfg(target_arch = "wasm32")]
pub fn get_current_time_ns() -> TimestampNs {
    ic_cdk::api::time()
}

/// Host builds (unit tests) read the system clock instead of the replica.
#[cfg(not(target_arch = "wasm32"))]
pub fn get_current_time_ns() -> TimestampNs {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// `dd.mm.yyyy, HH:MM:SS` in UTC. Display only, not sortable.
pub fn format_date_time(ts: TimestampNs) -> String {
    format_with(ts, "%d.%m.%Y, %H:%M:%S")
}

/// `dd.mm.yyyy` in UTC.
pub fn format_date(ts: TimestampNs) -> String {
    format_with(ts, "%d.%m.%Y")
}

fn format_with(ts: TimestampNs, pattern: &str) -> String {
    let secs = (ts / NANOS_PER_SEC) as i64;
    let nanos = (ts % NANOS_PER_SEC) as u32;
    match DateTime::from_timestamp(secs, nanos) {
        Some(dt) => dt.format(pattern).to_string(),
        None => String::new(),
    }
}
