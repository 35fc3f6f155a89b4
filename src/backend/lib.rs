// src/backend/lib.rs

#[macro_use]
pub mod utils;

pub mod adapter;
pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

use crate::api::*;
use crate::error::KeepsakeError;
use crate::models::config::{AppConfig, ConfigSummary};
use crate::models::init::InitArgs;
use crate::models::search::VideoSearchHit;
use crate::models::{DiaryEntry, EntityKind, Letter, MemorySummary, Photo, Video};
use crate::metrics::MetricsReport;
use crate::services::auth_service::SessionInfo;
use crate::services::scheduler::{perform_daily_maintenance, MAINTENANCE_INTERVAL};
use crate::utils::time::get_current_time_ns;
use ic_cdk::api::management_canister::http_request::{HttpResponse, TransformArgs};

#[ic_cdk::init]
fn init(args: InitArgs) {
    configure(AppConfig::from(args));
    start_maintenance_timer();
    log_info!("Keepsake backend canister initialized.");
}

#[ic_cdk::post_upgrade]
fn post_upgrade(args: Option<InitArgs>) {
    match args {
        Some(args) => configure(AppConfig::from(args)),
        None => configure(storage::get_config()),
    }
    start_maintenance_timer();
    log_info!("Keepsake backend canister upgraded.");
}

fn configure(config: AppConfig) {
    if let Err(e) = state::apply_config(config) {
        log_error!("Failed to apply configuration: {}", e);
    }
}

fn start_maintenance_timer() {
    ic_cdk_timers::set_timer_interval(MAINTENANCE_INTERVAL, || {
        perform_daily_maintenance(&state::keepsake().sessions, get_current_time_ns());
    });
}

// Export Candid interface
ic_cdk::export_candid!();
