// src/backend/services/reply_budget.rs
use candid::CandidType;

/// Largest Candid payload a list-style endpoint returns. Below both the query
/// (3 MiB) and the update (2 MiB) reply limits of the replica.
pub const MAX_REPLY_BYTES: usize = 1_900_000;

/// Keeps the leading `items` whose Candid encoding fits in `budget` bytes.
/// Anything past the budget is dropped and logged.
pub fn fit_reply<T: CandidType>(items: Vec<T>, budget: usize, what: &str) -> Vec<T> {
    let total = items.len();
    let mut used = 0usize;
    let mut kept = Vec::with_capacity(total);
    for item in items {
        let size = match candid::encode_one(&item) {
            Ok(bytes) => bytes.len(),
            Err(e) => {
                log_warn!("Skipping {} item that cannot be encoded: {}", what, e);
                continue;
            }
        };
        if used + size > budget {
            break;
        }
        used += size;
        kept.push(item);
    }
    if kept.len() < total {
        log_warn!(
            "Reply for {} truncated to {} of {} item(s) ({} bytes)",
            what,
            kept.len(),
            total,
            used
        );
    }
    kept
}
