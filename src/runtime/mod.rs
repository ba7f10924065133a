//! The outer scheduling loop: run a pass, sleep, repeat until the optional
//! wall-clock budget is used up. A pass that fails is logged and retried on
//! the next iteration with the not-yet-advanced cursor.

use crate::channels::telegram::api::TelegramApiClient;
use crate::config::Config;
use crate::gather::service::run_pass;
use crate::shared::logging::append_log_line;
use crate::store::GatherStore;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

pub fn run_polling_loop(
    api: &TelegramApiClient,
    store: &GatherStore,
    state_root: &Path,
    config: &Config,
) {
    let started = Instant::now();
    let budget = config.run_budget_seconds.map(Duration::from_secs);
    let interval = Duration::from_secs(config.poll_interval_seconds.max(1));

    loop {
        match run_pass(api, store, state_root) {
            Ok(report) => {
                let _ = append_log_line(
                    state_root,
                    &format!(
                        "pass complete: {} updates, {} actions executed ({} failed), {} gatherings saved",
                        report.updates_processed,
                        report.actions_executed,
                        report.actions_failed,
                        report.gatherings_saved
                    ),
                );
            }
            Err(err) => {
                let _ = append_log_line(state_root, &format!("pass failed: {err}"));
            }
        }

        // a new pass only starts while budget remains; a running pass is
        // never interrupted
        if let Some(budget) = budget {
            if started.elapsed() >= budget {
                break;
            }
        }
        thread::sleep(interval);
    }
}
